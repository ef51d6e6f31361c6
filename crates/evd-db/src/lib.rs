//! Storage layer for the event desk.
//!
//! Everything the desk persists is a JSON value under a well-known key in a
//! single key-value table, accessed through [`KvStore`]. Typed repositories
//! ([`AttendanceStore`], [`SessionStore`], [`CatalogStore`]) sit on top and are
//! the only code that knows the keys or the value shapes.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Each CLI invocation opens one connection and drops it on exit. Two processes
//! writing the same key race; the last writer wins and nothing is merged.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE kv (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```
//!
//! `updated_at` is ISO 8601 UTC and only informational.
//!
//! # Failure handling
//!
//! - A database that cannot be opened is replaced by [`Backend::Memory`] for the
//!   rest of the process (see [`Backend::open_or_memory`]).
//! - A stored value that fails to parse is treated as absent by the repositories.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

mod attendance;
mod catalog;
mod session;

pub use attendance::AttendanceStore;
pub use catalog::CatalogStore;
pub use session::SessionStore;

/// Key holding the attendance log.
pub const ATTENDANCE_KEY: &str = "attendance";
/// Key holding the session role string.
pub const ROLE_KEY: &str = "role";
/// Key holding the locally modified catalog.
pub const CATALOG_KEY: &str = "catalog";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The underlying store could not be read or written.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored value could not be parsed.
    #[error("malformed value under {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be serialized for storage.
    #[error("failed to serialize value for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A string key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError>;
    fn remove(&mut self, key: &str) -> Result<(), DbError>;
}

impl<T: KvStore + ?Sized> KvStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        (**self).remove(key)
    }
}

/// Reads and parses the JSON value under `key`.
pub(crate) fn get_json<T, S>(kv: &S, key: &str) -> Result<Option<T>, DbError>
where
    T: serde::de::DeserializeOwned,
    S: KvStore + ?Sized,
{
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| DbError::Malformed {
            key: key.to_string(),
            source,
        })
}

/// Serializes `value` and stores it under `key`.
pub(crate) fn set_json<T, S>(kv: &mut S, key: &str, value: &T) -> Result<(), DbError>
where
    T: serde::Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| DbError::Serialize {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &raw)
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A stored key with its size and last write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key: String,
    pub bytes: usize,
    pub updated_at: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Lists stored keys ordered by name.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, LENGTH(value), updated_at FROM kv ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| {
            let bytes: i64 = row.get(1)?;
            Ok(KeyInfo {
                key: row.get(0)?,
                bytes: usize::try_from(bytes).unwrap_or_default(),
                updated_at: row.get(2)?,
            })
        })?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

/// A key-value store that forgets everything when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.values.remove(key);
        Ok(())
    }
}

/// The store a process actually writes to.
pub enum Backend {
    Sqlite(Database),
    /// Used when the database is unavailable. Nothing survives the process.
    Memory(MemoryStore),
}

impl Backend {
    /// Opens the database at `path`, falling back to memory if that fails.
    pub fn open_or_memory(path: &Path) -> Self {
        match Database::open(path) {
            Ok(db) => Self::Sqlite(db),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    %err,
                    "storage unavailable; changes will not survive this session"
                );
                Self::Memory(MemoryStore::new())
            }
        }
    }

    /// Whether writes are durable.
    pub const fn is_persistent(&self) -> bool {
        matches!(self, Self::Sqlite(_))
    }

    /// Stored keys; always empty in memory mode.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>, DbError> {
        match self {
            Self::Sqlite(db) => db.list_keys(),
            Self::Memory(_) => Ok(Vec::new()),
        }
    }
}

impl KvStore for Backend {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        match self {
            Self::Sqlite(db) => db.get(key),
            Self::Memory(mem) => mem.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        match self {
            Self::Sqlite(db) => db.set(key, value),
            Self::Memory(mem) => mem.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        match self {
            Self::Sqlite(db) => db.remove(key),
            Self::Memory(mem) => mem.remove(key),
        }
    }
}

/// A store whose every operation fails, for exercising degraded paths.
#[cfg(test)]
pub(crate) struct BrokenStore;

#[cfg(test)]
impl KvStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, DbError> {
        Err(DbError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), DbError> {
        Err(DbError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    fn remove(&mut self, _key: &str) -> Result<(), DbError> {
        Err(DbError::Sqlite(rusqlite::Error::InvalidQuery))
    }
}

/// A store whose first `failures` reads fail, then passes through.
#[cfg(test)]
pub(crate) struct FlakyStore<S> {
    inner: S,
    failures: std::cell::Cell<usize>,
}

#[cfg(test)]
impl<S> FlakyStore<S> {
    pub(crate) const fn new(inner: S, failures: usize) -> Self {
        Self {
            inner,
            failures: std::cell::Cell::new(failures),
        }
    }
}

#[cfg(test)]
impl<S: KvStore> KvStore for FlakyStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let remaining = self.failures.get();
        if remaining > 0 {
            self.failures.set(remaining - 1);
            return Err(DbError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.inner.remove(key)
    }
}
