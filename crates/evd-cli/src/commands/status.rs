//! Status command for showing where data lives and what is stored.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use evd_core::Session;
use evd_db::{Backend, KeyInfo};

use super::util::current_session;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, backend: &mut Backend, config: &Config) -> Result<()> {
    let session = current_session(backend);
    let keys = backend.list_keys().context("failed to list stored keys")?;
    let database = backend
        .is_persistent()
        .then_some(config.database_path.as_path());
    write_status(writer, database, &session, &keys)
}

/// Writes the status report. `database` is `None` when running in memory.
pub fn write_status<W: Write>(
    writer: &mut W,
    database: Option<&Path>,
    session: &Session,
    keys: &[KeyInfo],
) -> Result<()> {
    writeln!(writer, "Event desk status")?;
    match database {
        Some(path) => writeln!(writer, "Database: {}", path.display())?,
        None => writeln!(writer, "Database: unavailable, changes are kept in memory")?,
    }
    match session.role() {
        Some(role) => writeln!(writer, "Role: {role}")?,
        None => writeln!(writer, "Role: (not logged in)")?,
    }

    if keys.is_empty() {
        writeln!(writer, "Nothing stored.")?;
        return Ok(());
    }

    writeln!(writer, "Stored:")?;
    for key in keys {
        writeln!(
            writer,
            "- {}: {} bytes, updated {}",
            key.key, key.bytes, key.updated_at
        )?;
    }

    Ok(())
}
