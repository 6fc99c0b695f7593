//! Connection Handle Module
//!
//! The opaque handle owned by a `SharedConnectionHolder`. Handles are only
//! built inside the crate, so the holder is the one way to obtain one:
//!
//! ```compile_fail
//! use singledb::ConnectionHandle;
//!
//! let conn = rusqlite::Connection::open_in_memory().unwrap();
//! let handle = ConnectionHandle::new(conn, "file:test", Default::default());
//! ```
//!
//! ```compile_fail
//! use singledb::ConnectionHandle;
//!
//! let handle = ConnectionHandle { session_id: uuid::Uuid::new_v4() };
//! ```
use crate::config::ErrorMode;
use crate::core::{ConnectionError, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

/// An open session to the backing store, shared by every caller of the holder.
pub struct ConnectionHandle {
    connection: Mutex<Connection>,
    session_id: Uuid,
    opened_at: DateTime<Utc>,
    dsn: String,
    error_mode: ErrorMode,
}

impl ConnectionHandle {
    pub(crate) fn new(connection: Connection, dsn: impl Into<String>, error_mode: ErrorMode) -> Self {
        ConnectionHandle {
            connection: Mutex::new(connection),
            session_id: Uuid::new_v4(),
            opened_at: Utc::now(),
            dsn: dsn.into(),
            error_mode,
        }
    }

    /// Unique identifier assigned when the session was opened.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    /// Locks the underlying connection for exclusive use.
    ///
    /// The guard must be dropped before other callers can use the session.
    pub fn lock(&self) -> std::result::Result<MutexGuard<'_, Connection>, ConnectionError> {
        self.connection.lock().map_err(|_| ConnectionError::Poisoned)
    }

    /// Runs `f` against the underlying connection.
    pub fn with_connection<T, F>(&self, f: F) -> std::result::Result<T, ConnectionError>
    where
        F: FnOnce(&Connection) -> T,
    {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Executes a batch of statements, reporting failure according to the
    /// handle's error mode.
    ///
    /// Returns `Ok(true)` on success. In `ErrorMode::Silent` a failed batch is
    /// logged and reported as `Ok(false)`; in `ErrorMode::Raise` it is returned
    /// as `Error::Statement`.
    pub fn execute_status(&self, sql: &str) -> Result<bool> {
        let outcome = self.with_connection(|conn| conn.execute_batch(sql))?;
        match (outcome, self.error_mode) {
            (Ok(()), _) => Ok(true),
            (Err(e), ErrorMode::Silent) => {
                warn!(session = %self.session_id, error = %e, "Statement failed");
                Ok(false)
            }
            (Err(e), ErrorMode::Raise) => Err(e.into()),
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("session_id", &self.session_id)
            .field("opened_at", &self.opened_at)
            .field("dsn", &self.dsn)
            .field("error_mode", &self.error_mode)
            .finish_non_exhaustive()
    }
}
