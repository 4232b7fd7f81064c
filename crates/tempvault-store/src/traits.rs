//! Store trait: the abstract interface for record persistence.
//!
//! This trait allows the vault to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory.

use async_trait::async_trait;
use tempvault_core::{AccessKey, Record};

use crate::error::Result;

/// Result of inserting a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// The record was written. Any expired occupant of the key was replaced.
    Inserted,
    /// A live record already holds this access key; nothing was written.
    AlreadyExists,
}

/// The Store trait: async interface for record persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// Every method touches at most one access key (except `expired_as_of`) and
/// must be atomic for that key.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a record unless a live record already holds its key.
    ///
    /// A record whose `expires_at <= now` counts as absent and is replaced.
    async fn insert(&self, record: &Record, now: i64) -> Result<InsertResult>;

    /// Get a record by access key, expired or not.
    async fn get(&self, key: &AccessKey) -> Result<Option<Record>>;

    /// Unconditional upsert.
    async fn put(&self, record: &Record) -> Result<()>;

    /// Overwrite the stored record only if it is the same creation as
    /// `record` (same `created_at`) and still live at `now`.
    ///
    /// Returns `false` when the key is missing, expired, or was re-created.
    async fn put_if_current(&self, record: &Record, now: i64) -> Result<bool>;

    /// Like [`Store::put_if_current`], and additionally requires the stored
    /// revision to equal `expected_revision`.
    async fn compare_and_put(
        &self,
        record: &Record,
        expected_revision: u64,
        now: i64,
    ) -> Result<bool>;

    /// Delete by access key. Returns whether a record was removed.
    ///
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &AccessKey) -> Result<bool>;

    /// Delete only if the stored record was created at `created_at`.
    async fn delete_if_current(&self, key: &AccessKey, created_at: i64) -> Result<bool>;

    /// Delete only if the stored record is due at `now`.
    async fn delete_if_expired(&self, key: &AccessKey, now: i64) -> Result<bool>;

    /// All records with `expires_at <= now`.
    async fn expired_as_of(&self, now: i64) -> Result<Vec<Record>>;

    /// Number of stored records, including ones that are due but not yet removed.
    async fn count(&self) -> Result<usize>;

    /// Release the backend. Later calls fail with `StoreError::Unavailable`.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn insert(&self, record: &Record, now: i64) -> Result<InsertResult> {
        (**self).insert(record, now).await
    }

    async fn get(&self, key: &AccessKey) -> Result<Option<Record>> {
        (**self).get(key).await
    }

    async fn put(&self, record: &Record) -> Result<()> {
        (**self).put(record).await
    }

    async fn put_if_current(&self, record: &Record, now: i64) -> Result<bool> {
        (**self).put_if_current(record, now).await
    }

    async fn compare_and_put(
        &self,
        record: &Record,
        expected_revision: u64,
        now: i64,
    ) -> Result<bool> {
        (**self).compare_and_put(record, expected_revision, now).await
    }

    async fn delete(&self, key: &AccessKey) -> Result<bool> {
        (**self).delete(key).await
    }

    async fn delete_if_current(&self, key: &AccessKey, created_at: i64) -> Result<bool> {
        (**self).delete_if_current(key, created_at).await
    }

    async fn delete_if_expired(&self, key: &AccessKey, now: i64) -> Result<bool> {
        (**self).delete_if_expired(key, now).await
    }

    async fn expired_as_of(&self, now: i64) -> Result<Vec<Record>> {
        (**self).expired_as_of(now).await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
