//! Roles and the session that carries one.
//!
//! Stored role strings are free text; this module is the single place where
//! they are normalized. Canonical spellings are `organiser` and `attendant`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role a user or session can act as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Organiser,
    Attendant,
    Volunteer,
}

impl Role {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Organiser => "organiser",
            Self::Attendant => "attendant",
            Self::Volunteer => "volunteer",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Organiser => "Organiser",
            Self::Attendant => "Attendant",
            Self::Volunteer => "Volunteer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "organiser" | "organizer" => Ok(Self::Organiser),
            "attendant" | "attendent" | "participant" => Ok(Self::Attendant),
            "volunteer" => Ok(Self::Volunteer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown role strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Which dashboard a session lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Organiser,
    Attendant,
    Volunteer,
    /// No usable role; the user has to log in first.
    Login,
}

/// The role the current session acts as.
///
/// Built once from storage and passed to whatever needs to gate behaviour.
/// A missing or unrecognised stored role yields a session with no role, which
/// has no privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    role: Option<Role>,
}

impl Session {
    /// Creates a session acting as `role`.
    pub const fn new(role: Role) -> Self {
        Self { role: Some(role) }
    }

    /// Creates a session without a role.
    pub const fn anonymous() -> Self {
        Self { role: None }
    }

    /// Builds a session from a raw stored role string.
    pub fn from_stored(raw: Option<&str>) -> Self {
        let role = raw.and_then(|s| match s.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::debug!(%err, "ignoring stored role");
                None
            }
        });
        Self { role }
    }

    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_organiser(&self) -> bool {
        self.role == Some(Role::Organiser)
    }

    /// Whether attendance records may be deleted.
    pub fn can_delete_attendance(&self) -> bool {
        self.is_organiser()
    }

    /// Whether the full attendance table is shown.
    pub fn can_view_full_attendance(&self) -> bool {
        self.is_organiser()
    }

    /// Whether new events may be created.
    pub fn can_create_events(&self) -> bool {
        self.is_organiser()
    }

    /// Whether the session may sign up for events. Organisers cannot.
    pub fn can_participate(&self) -> bool {
        self.role.is_some_and(|role| role != Role::Organiser)
    }

    /// The dashboard this session is routed to.
    pub const fn dashboard(&self) -> DashboardKind {
        match self.role {
            Some(Role::Organiser) => DashboardKind::Organiser,
            Some(Role::Attendant) => DashboardKind::Attendant,
            Some(Role::Volunteer) => DashboardKind::Volunteer,
            None => DashboardKind::Login,
        }
    }
}
