//! Per-role dashboards.

use serde::Serialize;

use crate::catalog::{Catalog, RegistrationSummary};
use crate::model::Event;
use crate::role::{DashboardKind, Session};

/// How many registrations the organiser dashboard lists.
const RECENT_REGISTRATIONS: usize = 5;

/// Dashboard contents for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dashboard {
    Organiser {
        total_registrations: u64,
        users: usize,
        events: usize,
        recent_registrations: Vec<RegistrationSummary>,
    },
    Attendant {
        my_events: Vec<Event>,
        upcoming: Vec<Event>,
    },
    Volunteer {
        helping: Vec<Event>,
    },
    /// The session has no role; nothing to show until login.
    Login,
}

fn slice(events: &[Event], start: usize, end: usize) -> Vec<Event> {
    let end = end.min(events.len());
    let start = start.min(end);
    events[start..end].to_vec()
}

/// Builds the dashboard `session` is routed to.
pub fn build(session: &Session, catalog: &Catalog) -> Dashboard {
    let events = catalog.events();
    match session.dashboard() {
        DashboardKind::Organiser => {
            let stats = catalog.stats();
            Dashboard::Organiser {
                total_registrations: stats.total_registrations,
                users: catalog.users().len(),
                events: stats.total_events,
                recent_registrations: catalog.recent_registrations(RECENT_REGISTRATIONS),
            }
        }
        DashboardKind::Attendant => Dashboard::Attendant {
            my_events: slice(events, 0, 3),
            upcoming: slice(events, 3, 5),
        },
        DashboardKind::Volunteer => Dashboard::Volunteer {
            helping: slice(events, 0, 2),
        },
        DashboardKind::Login => Dashboard::Login,
    }
}
