/// Error Module
///
/// Error types for singledb. `ConnectionError` is the only failure the shared
/// holder can report; `Error` wraps it together with configuration and I/O
/// failures for callers that load settings from disk.
use std::sync::Arc;
use thiserror::Error;

/// Failure to obtain the shared connection handle.
///
/// Cloning is cheap, so every caller that waited on the same failed attempt
/// receives the same error.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// The SQLite driver refused to open or prepare the session
    #[error("Failed to connect to '{dsn}': {source}")]
    Driver {
        dsn: String,
        #[source]
        source: Arc<rusqlite::Error>,
    },

    /// A connector rejected the attempt without a driver error
    #[error("Connection to '{dsn}' refused: {reason}")]
    Refused { dsn: String, reason: String },

    /// A lock guarding the handle or the construction gate was poisoned
    #[error("Failed to acquire database lock")]
    Poisoned,
}

impl ConnectionError {
    pub fn driver(dsn: impl Into<String>, source: rusqlite::Error) -> Self {
        ConnectionError::Driver {
            dsn: dsn.into(),
            source: Arc::new(source),
        }
    }

    pub fn refused(dsn: impl Into<String>, reason: impl Into<String>) -> Self {
        ConnectionError::Refused {
            dsn: dsn.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The shared connection could not be established
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// A statement issued through the shared handle failed
    #[error("Statement error: {0}")]
    Statement(#[from] rusqlite::Error),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML configuration
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Type alias for Result to use `Error` as the error type.
pub type Result<T> = std::result::Result<T, Error>;
