//! The persisted session role.

use evd_core::{Role, Session};

use crate::{DbError, KvStore, ROLE_KEY};

/// Reads and writes the role string under [`ROLE_KEY`].
pub struct SessionStore<S> {
    kv: S,
}

impl<S: KvStore> SessionStore<S> {
    pub const fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The current session. Unreadable storage reads as logged out.
    pub fn session(&self) -> Session {
        match self.kv.get(ROLE_KEY) {
            Ok(raw) => Session::from_stored(raw.as_deref()),
            Err(err) => {
                tracing::warn!(%err, "session storage unreadable; continuing without a role");
                Session::anonymous()
            }
        }
    }

    /// Stores `role` as the session role.
    pub fn login(&mut self, role: Role) -> Result<Session, DbError> {
        self.kv.set(ROLE_KEY, role.as_str())?;
        tracing::debug!(%role, "session role stored");
        Ok(Session::new(role))
    }

    /// Clears the session role.
    pub fn logout(&mut self) -> Result<(), DbError> {
        self.kv.remove(ROLE_KEY)
    }
}
