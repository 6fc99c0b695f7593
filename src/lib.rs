// Core infrastructure modules
pub mod core;

pub mod config;

pub use crate::config::{ConnectionSettings, ErrorMode};
pub use crate::core::db::{
    get_instance, shared_holder, ConnectionHandle, Connector, HolderState,
    SharedConnectionHolder, SqliteConnector,
};
pub use crate::core::{ConnectionError, Error, Result};
