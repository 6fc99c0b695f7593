/// Connector Module
///
/// The seam between the shared holder and the database driver. The holder
/// never opens sessions itself; it asks a `Connector` exactly once per
/// successful initialization.
use crate::config::ConnectionSettings;
use crate::core::ConnectionError;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

/// Opens a new driver session from connection settings.
pub trait Connector: Send + Sync {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Connection, ConnectionError>;
}

impl<F> Connector for F
where
    F: Fn(&ConnectionSettings) -> Result<Connection, ConnectionError> + Send + Sync,
{
    fn connect(&self, settings: &ConnectionSettings) -> Result<Connection, ConnectionError> {
        self(settings)
    }
}

/// Connector backed by the bundled SQLite driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

impl Connector for SqliteConnector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Connection, ConnectionError> {
        let dsn = settings.dsn();
        settings
            .validate()
            .map_err(|e| ConnectionError::refused(&dsn, e.to_string()))?;
        debug!(dsn = %dsn, host = %settings.host, "Opening SQLite session");

        if !settings.user.is_empty() || !settings.password.is_empty() {
            // SQLite has no user authentication
            debug!(user = %settings.user, "Ignoring credentials for SQLite session");
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&dsn, flags)
            .map_err(|e| ConnectionError::driver(&dsn, e))?;

        conn.busy_timeout(settings.connect_timeout())
            .map_err(|e| ConnectionError::driver(&dsn, e))?;

        // Initialize connection with common pragmas
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| ConnectionError::driver(&dsn, e))?;

        Ok(conn)
    }
}
