//! Persisted attendance log.

use evd_core::{AttendanceLog, AttendanceRepository, CheckInRecord};

use crate::{ATTENDANCE_KEY, DbError, KvStore, get_json, set_json};

/// The attendance log stored as a JSON array under [`ATTENDANCE_KEY`].
///
/// Storage failures never reach the caller. A failed read serves the last
/// known log. A failed write, or a failed read ahead of a write, switches the
/// store to memory-only for the rest of its life.
pub struct AttendanceStore<S> {
    kv: S,
    working: AttendanceLog,
    degraded: bool,
}

impl<S: KvStore> AttendanceStore<S> {
    pub fn new(kv: S) -> Self {
        let mut store = Self {
            kv,
            working: AttendanceLog::new(),
            degraded: false,
        };
        store.working = store.load();
        store
    }

    /// Whether writes have stopped reaching storage.
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Removes the whole log.
    pub fn clear(&mut self) -> Result<(), DbError> {
        self.working = AttendanceLog::new();
        if self.degraded {
            return Ok(());
        }
        self.kv.remove(ATTENDANCE_KEY)
    }

    /// The stored log. Malformed data reads as empty; an unreadable store is an error.
    fn read(&self) -> Result<AttendanceLog, DbError> {
        match get_json::<AttendanceLog, _>(&self.kv, ATTENDANCE_KEY) {
            Ok(log) => Ok(log.unwrap_or_default()),
            Err(err @ DbError::Malformed { .. }) => {
                tracing::warn!(%err, "discarding unreadable attendance log");
                Ok(AttendanceLog::new())
            }
            Err(err) => Err(err),
        }
    }

    fn load(&self) -> AttendanceLog {
        if self.degraded {
            return self.working.clone();
        }
        self.read().unwrap_or_else(|err| {
            tracing::warn!(%err, "attendance storage unreadable; using working copy");
            self.working.clone()
        })
    }

    /// Loads the log ahead of a write.
    ///
    /// If storage cannot be read, the store stops writing so the working copy
    /// never replaces a durable log it has not seen.
    fn load_for_write(&mut self) -> AttendanceLog {
        if self.degraded {
            return self.working.clone();
        }
        match self.read() {
            Ok(log) => log,
            Err(err) => {
                tracing::warn!(%err, "attendance storage unreadable; keeping log in memory");
                self.degraded = true;
                self.working.clone()
            }
        }
    }

    fn persist(&mut self, log: AttendanceLog) {
        if !self.degraded {
            if let Err(err) = set_json(&mut self.kv, ATTENDANCE_KEY, &log) {
                tracing::warn!(%err, "attendance storage unwritable; keeping log in memory");
                self.degraded = true;
            }
        }
        self.working = log;
    }
}

impl<S: KvStore> AttendanceRepository for AttendanceStore<S> {
    fn append(&mut self, record: CheckInRecord) {
        let mut log = self.load_for_write();
        log.push(record);
        tracing::debug!(records = log.len(), "attendance appended");
        self.persist(log);
    }

    fn read_all(&self) -> Vec<CheckInRecord> {
        self.load().into_records()
    }

    fn delete_at(&mut self, index: usize) {
        let mut log = self.load_for_write();
        if log.delete_at(index).is_none() {
            return;
        }
        self.persist(log);
    }
}
