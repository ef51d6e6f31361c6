//! The event catalog: the data snapshot and the single owner that mutates it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Event, Registration, User};
use crate::types::{Category, EventId, UserId};

/// Bundled seed data used when no data file is configured.
const SEED_JSON: &str = include_str!("../data/seed.json");

/// Catalog errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no event with id {0}")]
    UnknownEvent(EventId),

    #[error("no user with id {0}")]
    UnknownUser(UserId),

    #[error("an event with id {0} already exists")]
    DuplicateEvent(EventId),

    #[error("event {0} is at capacity")]
    Full(EventId),
}

/// Everything the desk knows about events, users and registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSnapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

impl DataSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The bundled seed snapshot.
    pub fn seed() -> Result<Self, serde_json::Error> {
        Self::from_json(SEED_JSON)
    }
}

/// How to order a catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Earliest first.
    #[default]
    Date,
    /// Most registrations first.
    Registrations,
    /// Largest capacity first.
    Capacity,
}

/// Filters and ordering for a catalog listing.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub sort: SortKey,
    /// Inclusive lower bound on the event date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date.
    pub to: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl EventQuery {
    fn matches(&self, event: &Event, search: Option<&str>) -> bool {
        if search.is_some_and(|needle| !event.title.to_lowercase().contains(needle)) {
            return false;
        }
        if self.from.is_some_and(|from| event.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| event.date > to) {
            return false;
        }
        self.category.is_none_or(|category| event.category() == category)
    }
}

/// Headline numbers for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_events: usize,
    pub total_registrations: u64,
    pub average_capacity: u64,
}

/// A registration joined with the names it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationSummary {
    pub user_name: Option<String>,
    pub event_title: Option<String>,
}

/// Owns the catalog state.
///
/// All mutation goes through this type so that updates to an event are a
/// single closure applied to the owned value.
#[derive(Debug, Clone)]
pub struct Catalog {
    data: DataSnapshot,
}

impl Catalog {
    pub const fn new(data: DataSnapshot) -> Self {
        Self { data }
    }

    pub fn events(&self) -> &[Event] {
        &self.data.events
    }

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.data.registrations
    }

    pub const fn snapshot(&self) -> &DataSnapshot {
        &self.data
    }

    pub fn into_snapshot(self) -> DataSnapshot {
        self.data
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.data.events.iter().find(|e| &e.id == id)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.data.users.iter().find(|u| &u.id == id)
    }

    /// Applies `update` to the event with `id` and returns the updated copy.
    pub fn update_event<F>(&mut self, id: &EventId, update: F) -> Result<Event, CatalogError>
    where
        F: FnOnce(&mut Event) -> Result<(), CatalogError>,
    {
        let event = self
            .data
            .events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| CatalogError::UnknownEvent(id.clone()))?;
        let mut next = event.clone();
        update(&mut next)?;
        *event = next;
        Ok(event.clone())
    }

    /// Records one more participant for an event, returning the new count.
    ///
    /// The count never exceeds the event's capacity.
    pub fn increment_registration(&mut self, id: &EventId) -> Result<u32, CatalogError> {
        let updated = self.update_event(id, |event| {
            if event.registrations >= event.capacity {
                return Err(CatalogError::Full(event.id.clone()));
            }
            event.registrations += 1;
            Ok(())
        })?;
        tracing::debug!(event = %id, registrations = updated.registrations, "registration incremented");
        Ok(updated.registrations)
    }

    /// Adds a new event. Ids must be unique.
    pub fn add_event(&mut self, event: Event) -> Result<(), CatalogError> {
        if self.event(&event.id).is_some() {
            return Err(CatalogError::DuplicateEvent(event.id));
        }
        self.data.events.push(event);
        Ok(())
    }

    /// Adds a user and their registration for an existing event.
    pub fn add_registration(
        &mut self,
        user: User,
        registration: Registration,
    ) -> Result<(), CatalogError> {
        if self.event(&registration.event_id).is_none() {
            return Err(CatalogError::UnknownEvent(registration.event_id));
        }
        if registration.user_id != user.id && self.user(&registration.user_id).is_none() {
            return Err(CatalogError::UnknownUser(registration.user_id));
        }
        if self.user(&user.id).is_none() {
            self.data.users.push(user);
        }
        self.data.registrations.push(registration);
        Ok(())
    }

    /// Events matching `query`, in the requested order.
    pub fn query(&self, query: &EventQuery) -> Vec<&Event> {
        let search = query.search.as_deref().map(str::to_lowercase);
        let mut events: Vec<&Event> = self
            .data
            .events
            .iter()
            .filter(|e| query.matches(e, search.as_deref()))
            .collect();
        match query.sort {
            SortKey::Date => events.sort_by_key(|e| e.date),
            SortKey::Registrations => {
                events.sort_by(|a, b| b.registrations.cmp(&a.registrations));
            }
            SortKey::Capacity => events.sort_by(|a, b| b.capacity.cmp(&a.capacity)),
        }
        events
    }

    pub fn stats(&self) -> CatalogStats {
        let total_events = self.data.events.len();
        let total_registrations = self
            .data
            .events
            .iter()
            .map(|e| u64::from(e.registrations))
            .sum();
        let total_capacity: u64 = self.data.events.iter().map(|e| u64::from(e.capacity)).sum();
        let average_capacity = if total_events == 0 {
            0
        } else {
            let count = total_events as u64;
            (total_capacity + count / 2) / count
        };
        CatalogStats {
            total_events,
            total_registrations,
            average_capacity,
        }
    }

    /// The last `limit` registrations, oldest first, with names resolved.
    pub fn recent_registrations(&self, limit: usize) -> Vec<RegistrationSummary> {
        let regs = &self.data.registrations;
        let start = regs.len().saturating_sub(limit);
        regs[start..]
            .iter()
            .map(|r| RegistrationSummary {
                user_name: self.user(&r.user_id).map(|u| u.name.clone()),
                event_title: self.event(&r.event_id).map(|e| e.title.clone()),
            })
            .collect()
    }
}

/// Shareable link for an event.
pub fn event_link(base_url: &str, id: &EventId) -> String {
    format!("{}/events#{id}", base_url.trim_end_matches('/'))
}
