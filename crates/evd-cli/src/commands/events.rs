//! Event catalog commands.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use evd_core::catalog::event_link;
use evd_core::wizard::{CreationWizard, EventDraft, WizardStep};
use evd_core::{Catalog, Event, EventId, EventQuery, Role};
use evd_db::{Backend, CatalogStore};
use serde::Serialize;

use super::util::{current_session, load_catalog, require_organiser};
use crate::Config;

/// Longest title shown in the listing before truncation.
const TITLE_WIDTH: usize = 26;

/// An event as listed, with its derived fields.
#[derive(Debug, Serialize)]
pub struct EventRow<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    #[serde(rename = "resolvedCategory")]
    pub resolved_category: &'static str,
    #[serde(rename = "progressPercent")]
    pub progress_percent: u32,
    pub featured: bool,
    pub link: String,
}

impl<'a> EventRow<'a> {
    fn new(event: &'a Event, base_url: &str) -> Self {
        Self {
            event,
            resolved_category: event.category().as_str(),
            progress_percent: event.progress_percent(),
            featured: event.is_featured(),
            link: event_link(base_url, &event.id),
        }
    }
}

fn truncate(title: &str) -> String {
    // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
    if title.chars().count() > TITLE_WIDTH {
        format!("{}...", title.chars().take(TITLE_WIDTH - 3).collect::<String>())
    } else {
        title.to_string()
    }
}

fn parse_id(id: &str) -> Result<EventId> {
    EventId::new(id).with_context(|| format!("invalid event id {id:?}"))
}

/// Formats the listing with catalog totals on top.
pub fn format_events(catalog: &Catalog, events: &[&Event]) -> String {
    use std::fmt::Write as _;

    let stats = catalog.stats();
    let mut out = format!(
        "Events: {}  Registrations: {}  Average capacity: {}\n\n",
        stats.total_events, stats.total_registrations, stats.average_capacity
    );

    if events.is_empty() {
        out.push_str("No events match.\n");
        return out;
    }

    writeln!(
        out,
        "{:<6} {:<10} {:<9} {:<26} REGISTERED",
        "ID", "DATE", "CATEGORY", "TITLE"
    )
    .unwrap();
    for event in events {
        write!(
            out,
            "{:<6} {:<10} {:<9} {:<26} {}/{} ({}%)",
            event.id.as_str(),
            event.date.to_string(),
            event.category().as_str(),
            truncate(&event.title),
            event.registrations,
            event.capacity,
            event.progress_percent()
        )
        .unwrap();
        if event.is_featured() {
            out.push_str(" *");
        }
        out.push('\n');
    }
    out
}

pub fn list<W: Write>(
    writer: &mut W,
    backend: &mut Backend,
    config: &Config,
    query: &EventQuery,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(backend, config)?;
    let events = catalog.query(query);
    tracing::debug!(matched = events.len(), "events queried");

    if json {
        let rows: Vec<EventRow<'_>> = events
            .iter()
            .map(|e| EventRow::new(e, &config.base_url))
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
    } else {
        write!(writer, "{}", format_events(&catalog, &events))?;
    }
    Ok(())
}

pub fn show<W: Write>(writer: &mut W, backend: &mut Backend, config: &Config, id: &str) -> Result<()> {
    let catalog = load_catalog(backend, config)?;
    let id = parse_id(id)?;
    let event = catalog
        .event(&id)
        .ok_or_else(|| anyhow!("no event with id {id}"))?;

    writeln!(writer, "{} ({})", event.title, event.id)?;
    writeln!(writer, "Date:        {}", event.date)?;
    writeln!(writer, "Category:    {}", event.category().label())?;
    write!(
        writer,
        "Registered:  {}/{} ({}%)",
        event.registrations,
        event.capacity,
        event.progress_percent()
    )?;
    if event.is_featured() {
        write!(writer, " featured")?;
    }
    writeln!(writer)?;
    if let Some(poster) = &event.poster {
        writeln!(writer, "Poster:      {poster}")?;
    }
    writeln!(writer, "Link:        {}", event_link(&config.base_url, &event.id))?;
    if !event.description.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", event.description)?;
    }
    Ok(())
}

/// Signs the current session up for an event.
pub fn participate<W: Write>(
    writer: &mut W,
    backend: &mut Backend,
    config: &Config,
    id: &str,
) -> Result<()> {
    let session = current_session(backend);
    // A session without a role does not default to attendant; signing up
    // needs an explicit login.
    if !session.can_participate() {
        match session.role() {
            Some(Role::Organiser) => bail!("organisers cannot sign up for events"),
            _ => bail!("log in to sign up for events"),
        }
    }

    let mut catalog = load_catalog(backend, config)?;
    let id = parse_id(id)?;
    let registrations = catalog.increment_registration(&id)?;
    CatalogStore::new(backend)
        .save(&catalog)
        .context("failed to save catalog")?;

    if let Some(event) = catalog.event(&id) {
        writeln!(
            writer,
            "Signed up for {} ({registrations}/{})",
            event.title, event.capacity
        )?;
    }
    Ok(())
}

/// Runs a draft through the creation steps and saves the new event.
pub fn create<W: Write>(
    writer: &mut W,
    backend: &mut Backend,
    config: &Config,
    draft: EventDraft,
) -> Result<EventId> {
    require_organiser(&current_session(backend), "create events")?;
    let mut catalog = load_catalog(backend, config)?;

    let mut wizard = CreationWizard::new(draft);
    let total = WizardStep::ALL.len();
    while wizard.step() != WizardStep::Summary {
        let step = wizard.step();
        wizard
            .next()
            .map_err(|err| anyhow!("{}: {err}", step.label()))?;
        let position = WizardStep::ALL
            .iter()
            .position(|s| *s == wizard.step())
            .unwrap_or_default();
        writeln!(
            writer,
            "Step {}/{total}: {} ({}%)",
            position + 1,
            wizard.step().label(),
            wizard.progress_percent()
        )?;
    }

    let event = wizard
        .finish()
        .map_err(|err| anyhow!("{}: {err}", WizardStep::Summary.label()))?;
    let id = event.id.clone();
    let title = event.title.clone();
    catalog.add_event(event)?;
    CatalogStore::new(backend)
        .save(&catalog)
        .context("failed to save catalog")?;

    writeln!(writer, "Created {title} ({id})")?;
    writeln!(writer, "{}", event_link(&config.base_url, &id))?;
    Ok(id)
}
