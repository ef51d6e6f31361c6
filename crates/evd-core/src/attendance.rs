//! The attendance log and the repository seam it is persisted through.

use serde::{Deserialize, Serialize};

use crate::model::CheckInRecord;

/// Maximum number of records kept in the persisted log.
pub const MAX_RETAINED: usize = 50;

/// Number of records shown in the live panel.
pub const RECENT_LIMIT: usize = 5;

/// Check-in records, most recent first, never longer than [`MAX_RETAINED`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CheckInRecord>", into = "Vec<CheckInRecord>")]
pub struct AttendanceLog {
    records: Vec<CheckInRecord>,
}

impl AttendanceLog {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[CheckInRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts `record` at the front, then drops whatever falls past the cap.
    pub fn push(&mut self, record: CheckInRecord) {
        self.records.insert(0, record);
        self.records.truncate(MAX_RETAINED);
    }

    /// Removes the record at `index`. Out-of-range indexes change nothing.
    pub fn delete_at(&mut self, index: usize) -> Option<CheckInRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    /// The `limit` most recent records.
    pub fn recent(&self, limit: usize) -> &[CheckInRecord] {
        &self.records[..self.records.len().min(limit)]
    }

    pub fn into_records(self) -> Vec<CheckInRecord> {
        self.records
    }
}

impl From<Vec<CheckInRecord>> for AttendanceLog {
    fn from(mut records: Vec<CheckInRecord>) -> Self {
        records.truncate(MAX_RETAINED);
        Self { records }
    }
}

impl From<AttendanceLog> for Vec<CheckInRecord> {
    fn from(log: AttendanceLog) -> Self {
        log.records
    }
}

/// Where the attendance log lives.
///
/// Implementations absorb their own storage failures: reads of missing or
/// corrupt data yield an empty log, and failed writes leave the log usable
/// for the rest of the session.
pub trait AttendanceRepository {
    /// Prepends `record` and persists the capped log.
    fn append(&mut self, record: CheckInRecord);

    /// The stored log, most recent first.
    fn read_all(&self) -> Vec<CheckInRecord>;

    /// Removes the record at `index` and persists the result.
    fn delete_at(&mut self, index: usize);
}

/// An attendance repository that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryAttendance {
    log: AttendanceLog,
}

impl InMemoryAttendance {
    pub const fn new() -> Self {
        Self {
            log: AttendanceLog::new(),
        }
    }
}

impl AttendanceRepository for InMemoryAttendance {
    fn append(&mut self, record: CheckInRecord) {
        self.log.push(record);
    }

    fn read_all(&self) -> Vec<CheckInRecord> {
        self.log.records().to_vec()
    }

    fn delete_at(&mut self, index: usize) {
        self.log.delete_at(index);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::model::{CheckInRecord, Event, User};
    use crate::types::{EventId, UserId};

    /// A record whose user name and time carry `n`, for ordering checks.
    pub fn record(n: usize) -> CheckInRecord {
        CheckInRecord {
            user: User {
                id: UserId::new(format!("u{n}")).unwrap(),
                name: format!("User {n}"),
                email: format!("user{n}@example.com"),
                role: None,
            },
            event: Event {
                id: EventId::new("evt1").unwrap(),
                title: "Tech Symposium".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
                description: String::new(),
                poster: None,
                category: None,
                capacity: 120,
                registrations: 42,
            },
            time: format!("10:00:{:02}", n % 60),
            poster: None,
        }
    }
}
