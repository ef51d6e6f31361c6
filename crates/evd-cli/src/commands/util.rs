//! Shared utilities for CLI commands.

use anyhow::{Context, Result, bail};
use evd_core::{Catalog, DataSnapshot, Session};
use evd_db::{Backend, CatalogStore, SessionStore};

use crate::Config;

/// The base catalog data: the configured data file, or the bundled seed.
pub fn load_snapshot(config: &Config) -> Result<DataSnapshot> {
    let Some(path) = &config.data_path else {
        return DataSnapshot::seed().context("bundled seed data is invalid");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    DataSnapshot::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

/// The catalog with any locally saved changes applied.
pub fn load_catalog(backend: &mut Backend, config: &Config) -> Result<Catalog> {
    let base = load_snapshot(config)?;
    Ok(CatalogStore::new(backend).load(base))
}

/// The session stored in `backend`.
pub fn current_session(backend: &mut Backend) -> Session {
    SessionStore::new(backend).session()
}

/// Fails unless the session is an organiser's.
pub fn require_organiser(session: &Session, action: &str) -> Result<()> {
    if session.is_organiser() {
        return Ok(());
    }
    match session.role() {
        Some(role) => bail!("only organisers can {action} (logged in as {role})"),
        None => bail!("only organisers can {action}; run `evd login` first"),
    }
}
