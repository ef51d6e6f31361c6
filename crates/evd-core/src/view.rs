//! The attendance desk: the check-in form, its notifications, and the
//! role-gated rendering of recent and historical check-ins.

use std::fmt::Write;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::attendance::{AttendanceRepository, RECENT_LIMIT};
use crate::catalog::DataSnapshot;
use crate::checkin::check_in;
use crate::model::CheckInRecord;
use crate::role::Session;

/// How long a notification stays up.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(1200);

pub const MSG_MARKED: &str = "Attendance marked!";
pub const MSG_INVALID: &str = "Invalid QR code!";
pub const MSG_DELETED: &str = "Attendance deleted!";

/// Errors raised by the desk before any lookup or mutation happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeskError {
    #[error("enter a code to check in")]
    EmptyCode,

    #[error("only organisers can delete attendance records")]
    NotPermitted,
}

/// State of the check-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A transient message with a dismissal deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: &'static str,
    pub expires_at: Instant,
}

/// Result of submitting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    CheckedIn(CheckInRecord),
    Invalid,
}

/// The attendance page: one form, a live panel and, for organisers, the full
/// history.
pub struct CheckInDesk<R> {
    session: Session,
    repo: R,
    history: Vec<CheckInRecord>,
    input: String,
    state: FormState,
    notification: Option<Notification>,
}

impl<R: AttendanceRepository> CheckInDesk<R> {
    /// Opens the desk, loading whatever history the repository holds.
    pub fn new(session: Session, repo: R) -> Self {
        let history = repo.read_all();
        tracing::debug!(records = history.len(), role = ?session.role(), "attendance desk opened");
        Self {
            session,
            repo,
            history,
            input: String::new(),
            state: FormState::Idle,
            notification: None,
        }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn state(&self) -> FormState {
        self.state
    }

    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// The live panel: the most recent check-ins.
    pub fn recent(&self) -> &[CheckInRecord] {
        &self.history[..self.history.len().min(RECENT_LIMIT)]
    }

    /// Everything the repository holds.
    pub fn history(&self) -> &[CheckInRecord] {
        &self.history
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Submits the current input against `data`.
    ///
    /// An empty input is rejected without touching state. Otherwise the input
    /// is cleared and a notification raised, whether or not the code matched.
    pub fn submit(&mut self, data: &DataSnapshot, now: Instant) -> Result<Submission, DeskError> {
        let code = self.input.trim().to_string();
        if code.is_empty() {
            return Err(DeskError::EmptyCode);
        }

        self.state = FormState::Submitting;
        self.input.clear();

        match check_in(&code, &data.registrations, &data.users, &data.events) {
            Ok(record) => {
                self.repo.append(record.clone());
                self.history = self.repo.read_all();
                self.finish(NotificationKind::Success, MSG_MARKED, now);
                tracing::info!(user = %record.user.name, event = %record.event.title, "attendance marked");
                Ok(Submission::CheckedIn(record))
            }
            Err(err) => {
                self.finish(NotificationKind::Failure, MSG_INVALID, now);
                tracing::info!(%err, "check-in rejected");
                Ok(Submission::Invalid)
            }
        }
    }

    /// Deletes the record at `index` of the history. Organisers only.
    ///
    /// Out-of-range indexes are ignored.
    pub fn delete(&mut self, index: usize, now: Instant) -> Result<(), DeskError> {
        if !self.session.can_delete_attendance() {
            return Err(DeskError::NotPermitted);
        }
        if index >= self.history.len() {
            tracing::debug!(index, "delete index out of range");
            return Ok(());
        }
        self.repo.delete_at(index);
        self.history = self.repo.read_all();
        self.finish(NotificationKind::Success, MSG_DELETED, now);
        Ok(())
    }

    /// Advances the clock, dismissing an expired notification.
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
            self.state = FormState::Idle;
        }
    }

    /// Drops any pending notification so nothing fires after the desk closes.
    pub fn teardown(&mut self) {
        self.notification = None;
        self.state = FormState::Idle;
    }

    fn finish(&mut self, kind: NotificationKind, message: &'static str, now: Instant) {
        self.state = match kind {
            NotificationKind::Success => FormState::Success,
            NotificationKind::Failure => FormState::Failure,
        };
        self.notification = Some(Notification {
            kind,
            message,
            expires_at: now + NOTIFICATION_TIMEOUT,
        });
    }

    /// Renders the live panel and, for organisers, the full history table.
    pub fn render(&self) -> String {
        render_attendance(&self.session, &self.history)
    }
}

/// Renders attendance for `session`.
///
/// Delete markers and the full table appear only for organisers.
pub fn render_attendance(session: &Session, history: &[CheckInRecord]) -> String {
    let mut out = String::new();
    if history.is_empty() {
        out.push_str("No attendance recorded yet.\n");
        return out;
    }

    let recent = &history[..history.len().min(RECENT_LIMIT)];
    let can_delete = session.can_delete_attendance();

    out.push_str("Recent Attendance\n");
    for (i, record) in recent.iter().enumerate() {
        write!(
            out,
            "  {} for {}  {}",
            record.user.name, record.event.title, record.time
        )
        .unwrap();
        if can_delete {
            write!(out, "  [delete {i}]").unwrap();
        }
        out.push('\n');
    }

    if session.can_view_full_attendance() {
        out.push_str("\nAll Attendance Records\n");
        writeln!(
            out,
            "{:<4} {:<16} {:<24} {:<24} TIME",
            "#", "NAME", "EMAIL", "EVENT"
        )
        .unwrap();
        for (i, record) in history.iter().enumerate() {
            writeln!(
                out,
                "{:<4} {:<16} {:<24} {:<24} {}",
                i, record.user.name, record.user.email, record.event.title, record.time
            )
            .unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::attendance::InMemoryAttendance;
    use crate::attendance::test_support::record;
    use crate::model::{Event, Registration, User};
    use crate::role::Role;
    use crate::types::{EventId, RegistrationId, UserId};

    fn scenario() -> DataSnapshot {
        DataSnapshot {
            events: vec![Event {
                id: EventId::new("evt1").unwrap(),
                title: "Tech Symposium".to_string(),
                date: "2024-07-10".parse().unwrap(),
                description: String::new(),
                poster: None,
                category: None,
                capacity: 120,
                registrations: 42,
            }],
            users: vec![User {
                id: UserId::new("u3").unwrap(),
                name: "Charlie".to_string(),
                email: "c@x.com".to_string(),
                role: None,
            }],
            registrations: vec![Registration {
                id: RegistrationId::new("r1").unwrap(),
                event_id: EventId::new("evt1").unwrap(),
                user_id: UserId::new("u3").unwrap(),
                qr_code: "XYZ123".to_string(),
                attended: false,
            }],
        }
    }

    fn desk(role: Role) -> CheckInDesk<InMemoryAttendance> {
        CheckInDesk::new(Session::new(role), InMemoryAttendance::new())
    }

    #[test]
    fn valid_code_is_recorded_at_front() {
        let data = scenario();
        let mut desk = desk(Role::Volunteer);
        let now = Instant::now();

        desk.set_input("XYZ123");
        let Submission::CheckedIn(record) = desk.submit(&data, now).unwrap() else {
            panic!("expected a check-in");
        };

        assert_eq!(record.user.name, "Charlie");
        assert_eq!(record.event.title, "Tech Symposium");
        assert_eq!(desk.history()[0], record);
        assert_eq!(desk.input(), "");
        assert_eq!(desk.state(), FormState::Success);
        assert_eq!(desk.notification().unwrap().message, MSG_MARKED);
    }

    #[test]
    fn bogus_code_changes_nothing_but_the_form() {
        let data = scenario();
        let mut desk = desk(Role::Organiser);
        let now = Instant::now();

        desk.set_input("XYZ123");
        desk.submit(&data, now).unwrap();
        desk.set_input("BOGUS");
        assert_eq!(desk.submit(&data, now).unwrap(), Submission::Invalid);

        assert_eq!(desk.history().len(), 1);
        assert_eq!(desk.state(), FormState::Failure);
        assert_eq!(desk.notification().unwrap().message, MSG_INVALID);
        assert_eq!(desk.input(), "");
    }

    #[test]
    fn empty_input_is_rejected_before_lookup() {
        let data = scenario();
        let mut desk = desk(Role::Attendant);
        desk.set_input("   ");
        assert_eq!(desk.submit(&data, Instant::now()), Err(DeskError::EmptyCode));
        assert_eq!(desk.state(), FormState::Idle);
        assert!(desk.notification().is_none());
    }

    #[test]
    fn notification_dismisses_after_timeout() {
        let data = scenario();
        let mut desk = desk(Role::Volunteer);
        let now = Instant::now();

        desk.set_input("BOGUS");
        desk.submit(&data, now).unwrap();

        desk.tick(now + Duration::from_millis(1199));
        assert_eq!(desk.state(), FormState::Failure);

        desk.tick(now + NOTIFICATION_TIMEOUT);
        assert_eq!(desk.state(), FormState::Idle);
        assert!(desk.notification().is_none());
    }

    #[test]
    fn teardown_cancels_pending_notification() {
        let data = scenario();
        let mut desk = desk(Role::Volunteer);
        desk.set_input("XYZ123");
        desk.submit(&data, Instant::now()).unwrap();
        desk.teardown();
        assert!(desk.notification().is_none());
        assert_eq!(desk.state(), FormState::Idle);
    }

    #[test]
    fn only_organisers_delete() {
        let mut repo = InMemoryAttendance::new();
        repo.append(record(1));
        let mut volunteer = CheckInDesk::new(Session::new(Role::Volunteer), repo);
        assert_eq!(
            volunteer.delete(0, Instant::now()),
            Err(DeskError::NotPermitted)
        );
        assert_eq!(volunteer.history().len(), 1);

        let repo = volunteer.into_repository();
        let mut organiser = CheckInDesk::new(Session::new(Role::Organiser), repo);
        organiser.delete(3, Instant::now()).unwrap();
        assert_eq!(organiser.history().len(), 1);
        assert!(organiser.notification().is_none());

        organiser.delete(0, Instant::now()).unwrap();
        assert!(organiser.history().is_empty());
        assert_eq!(organiser.notification().unwrap().message, MSG_DELETED);
    }

    #[test]
    fn live_panel_shows_five_most_recent() {
        let mut repo = InMemoryAttendance::new();
        for n in 0..7 {
            repo.append(record(n));
        }
        let desk = CheckInDesk::new(Session::new(Role::Volunteer), repo);
        assert_eq!(desk.recent().len(), 5);
        assert_eq!(desk.recent()[0].user.name, "User 6");
        assert_eq!(desk.history().len(), 7);
    }

    #[test]
    fn volunteer_sees_no_delete_controls_or_table() {
        let history = vec![record(2), record(1)];
        let output = render_attendance(&Session::new(Role::Volunteer), &history);
        assert!(!output.contains("[delete"));
        assert!(!output.contains("All Attendance Records"));
        assert_snapshot!(output, @r"
        Recent Attendance
          User 2 for Tech Symposium  10:00:02
          User 1 for Tech Symposium  10:00:01
        ");
    }

    #[test]
    fn organiser_sees_delete_controls_and_table() {
        let history = vec![record(2), record(1)];
        let output = render_attendance(&Session::new(Role::Organiser), &history);
        assert!(output.contains("[delete 0]"));
        assert!(output.contains("All Attendance Records"));
        assert_snapshot!(output, @r"
        Recent Attendance
          User 2 for Tech Symposium  10:00:02  [delete 0]
          User 1 for Tech Symposium  10:00:01  [delete 1]

        All Attendance Records
        #    NAME             EMAIL                    EVENT                    TIME
        0    User 2           user2@example.com        Tech Symposium           10:00:02
        1    User 1           user1@example.com        Tech Symposium           10:00:01
        ");
    }

    #[test]
    fn anonymous_session_sees_list_only() {
        let output = render_attendance(&Session::anonymous(), &[record(1)]);
        assert!(!output.contains("[delete"));
        assert!(!output.contains("All Attendance Records"));
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let output = render_attendance(&Session::new(Role::Organiser), &[]);
        assert_eq!(output, "No attendance recorded yet.\n");
    }
}
