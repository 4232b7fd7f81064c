//! Error types for Temp Vault Core.

use thiserror::Error;

/// Boundary validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid retention label: {0:?}")]
    InvalidRetentionLabel(String),

    #[error("access key must not be empty")]
    EmptyAccessKey,

    #[error("edit key must not be empty")]
    EmptyEditKey,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
