/// Core Module for singledb
///
/// Shared connection management and the error types used across the crate.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ConnectionError, Error, Result};
