//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Capacity must be a positive number of seats.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    /// Unknown event category.
    #[error("invalid category: {value}")]
    InvalidCategory { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated event identifier.
    EventId, "event ID"
);

define_string_id!(
    /// A validated user identifier.
    UserId, "user ID"
);

define_string_id!(
    /// A validated registration identifier.
    ///
    /// Identifies the link between a user and an event; the check-in code is a
    /// separate field on the registration.
    RegistrationId, "registration ID"
);

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Tech,
    Cultural,
    Sports,
    Art,
    Music,
    Science,
    Business,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 7] = [
        Self::Tech,
        Self::Cultural,
        Self::Sports,
        Self::Art,
        Self::Music,
        Self::Science,
        Self::Business,
    ];

    /// String representation used in storage and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Cultural => "cultural",
            Self::Sports => "sports",
            Self::Art => "art",
            Self::Music => "music",
            Self::Science => "science",
            Self::Business => "business",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tech => "Tech",
            Self::Cultural => "Cultural",
            Self::Sports => "Sports",
            Self::Art => "Art",
            Self::Music => "Music",
            Self::Science => "Science",
            Self::Business => "Business",
        }
    }

    /// Infers a category from keywords in an event title.
    ///
    /// Falls back to [`Category::Tech`] when nothing matches.
    pub fn infer_from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        let has = |needle: &str| title.contains(needle);
        if has("tech") || has("coding") || has("hackathon") {
            Self::Tech
        } else if has("cultural") {
            Self::Cultural
        } else if has("sport") {
            Self::Sports
        } else if has("art") {
            Self::Art
        } else if has("music") {
            Self::Music
        } else if has("science") {
            Self::Science
        } else if has("entrepreneur") {
            Self::Business
        } else {
            Self::Tech
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_rejects_empty() {
        assert!(EventId::new("").is_err());
        assert!(EventId::new("evt1").is_ok());
    }

    #[test]
    fn user_id_serde_rejects_empty() {
        let result: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn registration_id_serializes_as_plain_string() {
        let id = RegistrationId::new("r1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"r1\"");
        let parsed: RegistrationId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn category_from_str_is_case_insensitive() {
        assert_eq!("Music".parse::<Category>().unwrap(), Category::Music);
        assert_eq!(" tech ".parse::<Category>().unwrap(), Category::Tech);
        assert!("cooking".parse::<Category>().is_err());
    }

    #[test]
    fn category_inferred_from_title_keywords() {
        assert_eq!(Category::infer_from_title("Tech Symposium"), Category::Tech);
        assert_eq!(
            Category::infer_from_title("Cultural Fest"),
            Category::Cultural
        );
        assert_eq!(
            Category::infer_from_title("Inter-college Sports Meet"),
            Category::Sports
        );
        assert_eq!(
            Category::infer_from_title("Young Entrepreneurs Summit"),
            Category::Business
        );
        assert_eq!(Category::infer_from_title("Open Day"), Category::Tech);
    }

    #[test]
    fn category_serde_is_lowercase() {
        let json = serde_json::to_string(&Category::Science).unwrap();
        assert_eq!(json, "\"science\"");
    }
}
