//! Catalog entities and check-in records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::types::{Category, EventId, RegistrationId, UserId, ValidationError};

/// Something people can register for and check in to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,

    /// Image reference (URL or data URI). Empty strings are treated as absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub poster: Option<String>,

    /// Explicit category. When absent, [`Event::category`] infers one from the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Seat count, always positive.
    #[serde(deserialize_with = "positive_capacity")]
    pub capacity: u32,

    /// How many people have signed up so far.
    #[serde(default)]
    pub registrations: u32,
}

impl Event {
    /// The stored category, or one inferred from the title.
    pub fn category(&self) -> Category {
        self.category
            .unwrap_or_else(|| Category::infer_from_title(&self.title))
    }

    /// Fill level as a rounded percentage of capacity.
    pub fn progress_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 0;
        }
        let percent = (f64::from(self.registrations) / f64::from(self.capacity) * 100.0).round();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "ratio of two u32 values times 100 is non-negative and far below u32::MAX"
        )]
        let percent = percent as u32;
        percent
    }

    /// An event is featured once it is more than 70% full.
    pub fn is_featured(&self) -> bool {
        f64::from(self.registrations) > f64::from(self.capacity) * 0.7
    }
}

/// A person known to the desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Links a user to an event and carries the code presented at check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    #[serde(alias = "qr")]
    pub qr_code: String,
    #[serde(default)]
    pub attended: bool,
}

/// One entry in the attendance log.
///
/// `user` and `event` are copies taken at check-in time, so later catalog
/// changes do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub user: User,
    pub event: Event,
    /// Local wall-clock time of the check-in, `HH:MM:SS`.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn positive_capacity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let capacity = u32::deserialize(deserializer)?;
    if capacity == 0 {
        return Err(serde::de::Error::custom(ValidationError::ZeroCapacity));
    }
    Ok(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(registrations: u32, capacity: u32) -> Event {
        Event {
            id: EventId::new("evt1").unwrap(),
            title: "Tech Symposium".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            description: String::new(),
            poster: None,
            category: Some(Category::Tech),
            capacity,
            registrations,
        }
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(event(42, 120).progress_percent(), 35);
        assert_eq!(event(2, 3).progress_percent(), 67);
        assert_eq!(event(0, 10).progress_percent(), 0);
    }

    #[test]
    fn featured_above_seventy_percent() {
        assert!(!event(70, 100).is_featured());
        assert!(event(71, 100).is_featured());
    }

    #[test]
    fn empty_poster_deserializes_as_none() {
        let json = r#"{
            "id": "evt2",
            "title": "Cultural Fest",
            "date": "2024-08-05",
            "poster": "",
            "capacity": 200,
            "registrations": 58
        }"#;
        let parsed: Event = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.poster, None);
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.category(), Category::Cultural);
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn registration_accepts_short_code_field() {
        let json = r#"{"id":"r1","eventId":"evt1","userId":"u3","qr":"XYZ123"}"#;
        let parsed: Registration = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.qr_code, "XYZ123");
        assert!(!parsed.attended);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let json = r#"{"id":"evt9","title":"Empty Hall","date":"2024-08-05","capacity":0,"registrations":5}"#;
        let err = serde_json::from_str::<Event>(json).unwrap_err();
        assert!(err.to_string().starts_with("capacity must be greater than zero"));
    }
}
