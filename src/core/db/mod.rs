/// Database Module
///
/// Shared connection management for singledb, organized into focused
/// submodules:
/// - **Connector** (`connector.rs`): the seam to the SQLite driver
/// - **Handle** (`handle.rs`): the opaque shared session
/// - **Holder** (`holder.rs`): lazy single construction and shared access
///
/// Most callers only need `get_instance()`, which uses the process-wide holder
/// built from the default `ConnectionSettings`.
pub mod connector;
pub mod handle;
pub mod holder;

pub use connector::*;
pub use handle::*;
pub use holder::*;

use crate::config::ConnectionSettings;
use crate::core::ConnectionError;
use once_cell::sync::Lazy;

/// Process-wide holder. Lives until process exit; it is never reset.
static SHARED: Lazy<SharedConnectionHolder> =
    Lazy::new(|| SharedConnectionHolder::new(ConnectionSettings::default(), SqliteConnector));

/// Returns the process-wide connection handle, opening it on first use.
///
/// # Examples
///
/// ```
/// let first = singledb::get_instance()?;
/// let second = singledb::get_instance()?;
/// assert!(std::ptr::eq(first, second));
/// # Ok::<(), singledb::ConnectionError>(())
/// ```
pub fn get_instance() -> Result<&'static ConnectionHandle, ConnectionError> {
    SHARED.get_instance()
}

/// The process-wide holder behind `get_instance()`.
pub fn shared_holder() -> &'static SharedConnectionHolder {
    &SHARED
}
