//! Login and registration forms.
//!
//! Neither form verifies anything against a credential store; they only
//! check that the input is well-formed.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Registration, User};
use crate::role::Role;
use crate::types::{EventId, RegistrationId, UserId};

/// Pre-compiled pattern for a plausible email address.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Minimum password length accepted by both forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Form validation failure, carrying every field error found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", join_messages(.0))]
pub struct FormError(pub Vec<FieldError>);

impl FormError {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Converts collected field errors into a result.
pub(crate) fn into_result(errors: Vec<FieldError>) -> Result<(), FormError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormError(errors))
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 chars",
        ));
    }
}

/// Login input.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl LoginForm {
    /// Validates the form, returning the role the session should take.
    pub fn validate(&self) -> Result<Role, FormError> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email required"));
        }
        check_password(&self.password, &mut errors);
        into_result(errors)?;
        Ok(self.role)
    }
}

/// Registration input for one event.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
    pub confirm_password: String,
    pub event_id: String,
}

/// What a successful registration produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub user: User,
    pub registration: Registration,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), FormError> {
        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("full_name", "Full name required"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email required"));
        } else if !EMAIL_RE.is_match(email) {
            errors.push(FieldError::new("email", "Enter a valid email"));
        }
        check_password(&self.password, &mut errors);
        if self.password != self.confirm_password {
            errors.push(FieldError::new(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        if self.event_id.trim().is_empty() {
            errors.push(FieldError::new("event", "Select an event"));
        }
        into_result(errors)
    }

    /// Validates and builds the user and registration records.
    ///
    /// The check-in code is `<email>-<role>`.
    pub fn submit(&self) -> Result<NewRegistration, FormError> {
        self.validate()?;
        let email = self.email.trim().to_string();
        let invalid_event = || FormError(vec![FieldError::new("event", "Select an event")]);
        let event_id = EventId::new(self.event_id.trim()).map_err(|_| invalid_event())?;

        let user_id = UserId::new(format!("u-{}", Uuid::new_v4())).map_err(|_| invalid_event())?;
        let registration_id =
            RegistrationId::new(format!("r-{}", Uuid::new_v4())).map_err(|_| invalid_event())?;

        let qr_code = qr_value(&email, self.role);
        let user = User {
            id: user_id.clone(),
            name: self.full_name.trim().to_string(),
            email,
            role: Some(self.role),
        };
        let registration = Registration {
            id: registration_id,
            event_id,
            user_id,
            qr_code,
            attended: false,
        };
        Ok(NewRegistration { user, registration })
    }
}

/// The code handed to a registrant.
pub fn qr_value(email: &str, role: Role) -> String {
    format!("{email}-{role}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration_form() -> RegistrationForm {
        RegistrationForm {
            full_name: "Eve Adams".to_string(),
            email: "eve@example.com".to_string(),
            role: Role::Attendant,
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            event_id: "evt2".to_string(),
        }
    }

    #[test]
    fn login_requires_email_and_password() {
        let form = LoginForm {
            email: String::new(),
            password: String::new(),
            role: Role::Volunteer,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.message_for("email"), Some("Email required"));
        assert_eq!(err.message_for("password"), Some("Password required"));
        assert_eq!(err.to_string(), "Email required; Password required");
    }

    #[test]
    fn login_rejects_short_password() {
        let form = LoginForm {
            email: "a@x.com".to_string(),
            password: "12345".to_string(),
            role: Role::Organiser,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.message_for("password"),
            Some("Password must be at least 6 chars")
        );
    }

    #[test]
    fn login_returns_chosen_role() {
        let form = LoginForm {
            email: "a@x.com".to_string(),
            password: "123456".to_string(),
            role: Role::Organiser,
        };
        assert_eq!(form.validate().unwrap(), Role::Organiser);
    }

    #[test]
    fn registration_collects_every_error() {
        let form = RegistrationForm {
            full_name: " ".to_string(),
            email: "not-an-email".to_string(),
            confirm_password: "different".to_string(),
            event_id: String::new(),
            ..registration_form()
        };
        let err = form.validate().unwrap_err();
        let fields: Vec<&str> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["full_name", "email", "confirm_password", "event"]);
        assert_eq!(err.message_for("email"), Some("Enter a valid email"));
    }

    #[test]
    fn registration_builds_linked_records() {
        let created = registration_form().submit().unwrap();
        assert_eq!(created.user.name, "Eve Adams");
        assert_eq!(created.user.role, Some(Role::Attendant));
        assert_eq!(created.registration.user_id, created.user.id);
        assert_eq!(created.registration.event_id.as_str(), "evt2");
        assert_eq!(created.registration.qr_code, "eve@example.com-attendant");
        assert!(!created.registration.attended);
    }

    #[test]
    fn qr_value_uses_canonical_role() {
        assert_eq!(qr_value("c@x.com", Role::Volunteer), "c@x.com-volunteer");
    }
}
