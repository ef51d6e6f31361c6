//! Check-in engine: resolves a presented code to a user and an event.
//!
//! Lookup is pure. Persisting the resulting record is the caller's job.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::model::{CheckInRecord, Event, Registration, User};

/// Format used for the wall-clock time stored on each record.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Check-in failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckInError {
    /// No registration carries this code, or its user/event is gone.
    #[error("invalid code: {0}")]
    CodeNotFound(String),
}

/// Looks up `code` and builds a check-in record stamped with the current time.
pub fn check_in(
    code: &str,
    registrations: &[Registration],
    users: &[User],
    events: &[Event],
) -> Result<CheckInRecord, CheckInError> {
    check_in_at(code, registrations, users, events, Local::now())
}

/// Same as [`check_in`] with an explicit timestamp.
///
/// The first registration whose code equals `code` exactly wins.
pub fn check_in_at(
    code: &str,
    registrations: &[Registration],
    users: &[User],
    events: &[Event],
    now: DateTime<Local>,
) -> Result<CheckInRecord, CheckInError> {
    let not_found = || CheckInError::CodeNotFound(code.to_string());

    let registration = registrations
        .iter()
        .find(|r| r.qr_code == code)
        .ok_or_else(not_found)?;

    let user = users.iter().find(|u| u.id == registration.user_id);
    let event = events.iter().find(|e| e.id == registration.event_id);
    let (Some(user), Some(event)) = (user, event) else {
        tracing::warn!(
            registration = %registration.id,
            "registration references a missing user or event"
        );
        return Err(not_found());
    };

    tracing::debug!(registration = %registration.id, user = %user.id, event = %event.id, "code resolved");
    Ok(CheckInRecord {
        user: user.clone(),
        event: event.clone(),
        time: now.format(TIME_FORMAT).to_string(),
        poster: event.poster.clone(),
    })
}
