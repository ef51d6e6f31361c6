//! Core domain logic for the event desk.
//!
//! This crate contains the fundamental types and logic for:
//! - Catalog: events, users and registrations, and the single owner that mutates them
//! - Check-in: resolving a presented code to a registration
//! - Attendance: the capped check-in log and the repository seam it persists through
//! - Sessions: role normalization and permission gates
//! - Forms: login, registration and the event creation wizard

pub mod attendance;
pub mod catalog;
mod checkin;
pub mod dashboard;
pub mod forms;
mod model;
pub mod role;
pub mod types;
pub mod view;
pub mod wizard;

pub use attendance::{AttendanceLog, AttendanceRepository, InMemoryAttendance};
pub use catalog::{Catalog, CatalogError, DataSnapshot, EventQuery, SortKey};
pub use checkin::{CheckInError, TIME_FORMAT, check_in, check_in_at};
pub use model::{CheckInRecord, Event, Registration, User};
pub use role::{Role, Session};
pub use types::{Category, EventId, RegistrationId, UserId, ValidationError};
pub use view::CheckInDesk;
