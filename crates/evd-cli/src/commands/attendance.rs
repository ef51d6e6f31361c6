//! Attendance log commands.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use evd_core::view::render_attendance;
use evd_core::{AttendanceRepository, CheckInDesk};
use evd_db::{AttendanceStore, Backend};

use super::util::{current_session, require_organiser};

/// Prints the log as the current session is allowed to see it.
pub fn list<W: Write>(writer: &mut W, backend: &mut Backend, json: bool) -> Result<()> {
    let session = current_session(backend);
    let records = AttendanceStore::new(backend).read_all();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&records)?)?;
    } else {
        write!(writer, "{}", render_attendance(&session, &records))?;
    }
    Ok(())
}

/// Deletes the record at `index`. Organisers only.
pub fn delete<W: Write>(writer: &mut W, backend: &mut Backend, index: usize) -> Result<()> {
    let session = current_session(backend);
    let mut desk = CheckInDesk::new(session, AttendanceStore::new(backend));
    desk.delete(index, Instant::now())?;

    match desk.notification() {
        Some(notification) => writeln!(writer, "{}", notification.message)?,
        None => writeln!(writer, "No attendance record at position {index}")?,
    }
    desk.teardown();
    Ok(())
}

/// Empties the log. Organisers only.
pub fn clear<W: Write>(writer: &mut W, backend: &mut Backend) -> Result<()> {
    require_organiser(&current_session(backend), "clear attendance")?;
    AttendanceStore::new(backend)
        .clear()
        .context("failed to clear attendance")?;
    writeln!(writer, "Attendance cleared")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use evd_core::Role;
    use evd_db::{MemoryStore, SessionStore};

    use crate::Config;
    use crate::commands::check_in;

    fn backend_with_checkin(role: Role) -> Backend {
        let mut backend = Backend::Memory(MemoryStore::new());
        SessionStore::new(&mut backend).login(role).unwrap();
        check_in::run(&mut Vec::new(), &mut backend, &Config::default(), "XYZ123").unwrap();
        backend
    }

    #[test]
    fn volunteer_cannot_delete() {
        let mut backend = backend_with_checkin(Role::Volunteer);
        let err = delete(&mut Vec::new(), &mut backend, 0).unwrap_err();
        assert_eq!(err.to_string(), "only organisers can delete attendance records");
        assert_eq!(AttendanceStore::new(&mut backend).read_all().len(), 1);
    }

    #[test]
    fn organiser_deletes_by_position() {
        let mut backend = backend_with_checkin(Role::Organiser);
        let mut out = Vec::new();

        delete(&mut out, &mut backend, 5).unwrap();
        delete(&mut out, &mut backend, 0).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No attendance record at position 5\nAttendance deleted!\n"
        );
        assert!(AttendanceStore::new(&mut backend).read_all().is_empty());
    }

    #[test]
    fn list_json_has_snapshots_of_user_and_event() {
        let mut backend = backend_with_checkin(Role::Volunteer);
        let mut out = Vec::new();
        list(&mut out, &mut backend, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["user"]["email"], "c@x.com");
        assert_eq!(value[0]["event"]["id"], "evt1");
    }

    #[test]
    fn clear_is_organiser_only() {
        let mut backend = backend_with_checkin(Role::Attendant);
        assert!(clear(&mut Vec::new(), &mut backend).is_err());

        SessionStore::new(&mut backend).login(Role::Organiser).unwrap();
        clear(&mut Vec::new(), &mut backend).unwrap();
        let mut out = Vec::new();
        list(&mut out, &mut backend, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No attendance recorded yet.\n");
    }
}
