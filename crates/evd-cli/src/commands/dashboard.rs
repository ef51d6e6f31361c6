//! The role dashboard.

use std::io::Write;

use anyhow::Result;
use evd_core::dashboard::{self, Dashboard};
use evd_core::{Event, Role};
use evd_db::Backend;

use super::util::{current_session, load_catalog};
use crate::Config;

fn write_events<W: Write>(writer: &mut W, heading: &str, events: &[Event]) -> Result<()> {
    writeln!(writer, "{heading}")?;
    if events.is_empty() {
        writeln!(writer, "  (none)")?;
    }
    for event in events {
        writeln!(writer, "  {}  {}", event.date, event.title)?;
    }
    Ok(())
}

/// Formats `dashboard` as text.
pub fn write_dashboard<W: Write>(writer: &mut W, dashboard: &Dashboard) -> Result<()> {
    match dashboard {
        Dashboard::Organiser {
            total_registrations,
            users,
            events,
            recent_registrations,
        } => {
            writeln!(writer, "{} dashboard", Role::Organiser.label())?;
            writeln!(writer, "Registrations: {total_registrations}")?;
            writeln!(writer, "Users: {users}")?;
            writeln!(writer, "Events: {events}")?;
            writeln!(writer, "Recent registrations")?;
            for summary in recent_registrations {
                writeln!(
                    writer,
                    "  {} for {}",
                    summary.user_name.as_deref().unwrap_or("(unknown user)"),
                    summary.event_title.as_deref().unwrap_or("(unknown event)")
                )?;
            }
        }
        Dashboard::Attendant { my_events, upcoming } => {
            writeln!(writer, "{} dashboard", Role::Attendant.label())?;
            write_events(writer, "My events", my_events)?;
            write_events(writer, "Upcoming", upcoming)?;
        }
        Dashboard::Volunteer { helping } => {
            writeln!(writer, "{} dashboard", Role::Volunteer.label())?;
            write_events(writer, "Helping at", helping)?;
        }
        Dashboard::Login => {
            writeln!(writer, "Not logged in. Run `evd login` to choose a role.")?;
        }
    }
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, backend: &mut Backend, config: &Config, json: bool) -> Result<()> {
    let session = current_session(backend);
    let catalog = load_catalog(backend, config)?;
    let dashboard = dashboard::build(&session, &catalog);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&dashboard)?)?;
    } else {
        write_dashboard(writer, &dashboard)?;
    }
    Ok(())
}
