//! The check-in command.

use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use evd_core::CheckInDesk;
use evd_core::view::Submission;
use evd_db::{AttendanceStore, Backend};

use super::util::{current_session, load_catalog};
use crate::Config;

/// Checks in `code` and prints the outcome followed by the attendance panel.
///
/// An unknown code is reported, not treated as a failure.
pub fn run<W: Write>(
    writer: &mut W,
    backend: &mut Backend,
    config: &Config,
    code: &str,
) -> Result<Submission> {
    let session = current_session(backend);
    let catalog = load_catalog(backend, config)?;

    let mut desk = CheckInDesk::new(session, AttendanceStore::new(backend));
    desk.set_input(code);
    let submission = desk.submit(catalog.snapshot(), Instant::now())?;

    if let Some(notification) = desk.notification() {
        writeln!(writer, "{}", notification.message)?;
    }
    if let Submission::CheckedIn(record) = &submission {
        writeln!(
            writer,
            "{} checked in to {} at {}",
            record.user.name, record.event.title, record.time
        )?;
    }
    writeln!(writer)?;
    write!(writer, "{}", desk.render())?;
    desk.teardown();

    Ok(submission)
}
