/// Shared Connection Holder Module
///
/// Owns at most one `ConnectionHandle` and hands out references to it. The
/// handle is created lazily by the first successful `get_instance()` call and
/// then reused for the lifetime of the holder.
use crate::config::ConnectionSettings;
use crate::core::db::connector::{Connector, SqliteConnector};
use crate::core::db::handle::ConnectionHandle;
use crate::core::ConnectionError;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{info, trace, warn};

/// Lifecycle of a holder. `Populated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderState {
    /// No handle has been constructed yet (or every attempt so far failed)
    Empty,
    /// The shared handle exists and is returned to every caller
    Populated,
}

/// Bookkeeping for connection attempts, guarded by the construction gate.
#[derive(Debug, Default)]
struct Attempts {
    completed: u64,
    last_failure: Option<ConnectionError>,
}

/// Lazily constructs and then shares a single connection handle.
pub struct SharedConnectionHolder<C = SqliteConnector> {
    settings: ConnectionSettings,
    connector: C,
    handle: OnceCell<ConnectionHandle>,
    gate: Mutex<Attempts>,
    /// Mirror of `Attempts::completed` readable without the gate
    completed: AtomicU64,
}

impl<C: Connector> SharedConnectionHolder<C> {
    /// Creates an empty holder. No connection is opened until the first
    /// `get_instance()` call.
    ///
    /// Each holder owns its own handle, so the one-handle-per-process
    /// guarantee only covers the process-wide holder behind
    /// `crate::get_instance()` and `crate::shared_holder()`. Building a holder
    /// directly is for plugging in other connectors, such as test doubles.
    pub fn new(settings: ConnectionSettings, connector: C) -> Self {
        SharedConnectionHolder {
            settings,
            connector,
            handle: OnceCell::new(),
            gate: Mutex::new(Attempts::default()),
            completed: AtomicU64::new(0),
        }
    }

    /// Returns the shared handle, opening it first if necessary.
    ///
    /// Once a handle exists every call returns that same handle without I/O.
    /// Concurrent callers never trigger more than one connection attempt at a
    /// time; callers that waited on an attempt share its outcome. A failed
    /// attempt stores nothing, so a later call tries again.
    ///
    /// # Errors
    ///
    /// `ConnectionError` when the connector fails.
    pub fn get_instance(&self) -> Result<&ConnectionHandle, ConnectionError> {
        if let Some(handle) = self.handle.get() {
            trace!(session = %handle.session_id(), "Reusing shared connection");
            return Ok(handle);
        }

        let seen = self.completed.load(Ordering::Acquire);
        // A panicking connector leaves no partial state behind
        let mut attempts = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = self.handle.get() {
            return Ok(handle);
        }
        if attempts.completed > seen {
            if let Some(err) = &attempts.last_failure {
                return Err(err.clone());
            }
        }

        let dsn = self.settings.dsn();
        let result = self.connector.connect(&self.settings);

        attempts.completed += 1;
        self.completed.store(attempts.completed, Ordering::Release);

        match result {
            Ok(conn) => {
                attempts.last_failure = None;
                let handle = ConnectionHandle::new(conn, dsn, self.settings.error_mode);
                info!(
                    session = %handle.session_id(),
                    dsn = %handle.dsn(),
                    attempt = attempts.completed,
                    "Opened shared connection"
                );
                Ok(self.handle.get_or_init(move || handle))
            }
            Err(err) => {
                warn!(dsn = %dsn, attempt = attempts.completed, error = %err, "Connection attempt failed");
                attempts.last_failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Returns the handle if it has already been constructed.
    pub fn get(&self) -> Option<&ConnectionHandle> {
        self.handle.get()
    }

    pub fn state(&self) -> HolderState {
        if self.handle.get().is_some() {
            HolderState::Populated
        } else {
            HolderState::Empty
        }
    }

    /// Number of connection attempts that have finished, successful or not.
    pub fn attempts(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }
}

impl<C> fmt::Debug for SharedConnectionHolder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedConnectionHolder")
            .field("settings", &self.settings)
            .field("handle", &self.handle.get())
            .field("attempts", &self.completed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
