//! Error types for the store module.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every variant means the persistence medium could not answer. None of
/// them say anything about whether a record exists.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The backend could not be reached (poisoned lock, failed worker, closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not finish in time.
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
