//! Registering a new user for an event.

use std::io::Write;

use anyhow::{Context, Result};
use evd_core::forms::RegistrationForm;
use evd_db::{Backend, CatalogStore};

use super::util::load_catalog;
use crate::Config;

/// Adds the registrant and their registration, printing the check-in code.
pub fn run<W: Write>(
    writer: &mut W,
    backend: &mut Backend,
    config: &Config,
    form: &RegistrationForm,
) -> Result<String> {
    let created = form.submit()?;
    let mut catalog = load_catalog(backend, config)?;

    let code = created.registration.qr_code.clone();
    let event_id = created.registration.event_id.clone();
    catalog.add_registration(created.user, created.registration)?;
    CatalogStore::new(backend)
        .save(&catalog)
        .context("failed to save catalog")?;
    tracing::debug!(event = %event_id, "registration added");

    let title = catalog.event(&event_id).map_or("", |e| e.title.as_str());
    writeln!(writer, "Registered for {title}")?;
    writeln!(writer, "Check-in code: {code}")?;
    Ok(code)
}
