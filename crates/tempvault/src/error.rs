//! Error types for the Vault.

use tempvault_core::{AccessKey, CoreError};
use tempvault_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Vault operations.
///
/// Each variant is a distinct user-visible outcome. A wrong edit key is
/// always `Unauthorized`, never `NotFound`.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A live vault already holds this access key.
    #[error("vault already exists: {0}")]
    AlreadyExists(AccessKey),

    /// No vault holds this access key.
    #[error("vault not found: {0}")]
    NotFound(AccessKey),

    /// The vault expired; it has been removed.
    #[error("vault expired: {0}")]
    Expired(AccessKey),

    /// The supplied edit key does not match.
    #[error("wrong edit key for vault {0}")]
    Unauthorized(AccessKey),

    /// A compare-and-swap update lost the race.
    #[error("vault {key} was modified concurrently: expected revision {expected}")]
    Conflict { key: AccessKey, expected: u64 },

    /// The store could not answer (I/O, closed, timed out). Retryable.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    /// Unknown retention label at the boundary.
    #[error("invalid retention label: {0:?}")]
    InvalidRetentionLabel(String),

    /// Empty access key or blank edit key.
    #[error("invalid key: {0}")]
    InvalidKey(CoreError),
}

impl VaultError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VaultError::StorageUnavailable(_))
    }
}

impl From<CoreError> for VaultError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidRetentionLabel(label) => VaultError::InvalidRetentionLabel(label),
            other => VaultError::InvalidKey(other),
        }
    }
}

/// Result type for Vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
