//! Stores that misbehave on purpose.

use std::future;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tempvault_core::{AccessKey, Record};
use tempvault_store::{InsertResult, MemoryStore, Result, Store, StoreError};

/// A store whose every call hangs forever once stalled.
///
/// Starts healthy and delegates to an inner `MemoryStore`; call
/// [`StallingStore::stall`] to make later calls never complete.
#[derive(Default)]
pub struct StallingStore {
    inner: MemoryStore,
    stalled: AtomicBool,
}

impl StallingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that hangs from the first call.
    pub fn stalled() -> Self {
        let store = Self::new();
        store.stall();
        store
    }

    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.stalled.store(false, Ordering::SeqCst);
    }

    async fn gate(&self) {
        if self.stalled.load(Ordering::SeqCst) {
            future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl Store for StallingStore {
    async fn insert(&self, record: &Record, now: i64) -> Result<InsertResult> {
        self.gate().await;
        self.inner.insert(record, now).await
    }

    async fn get(&self, key: &AccessKey) -> Result<Option<Record>> {
        self.gate().await;
        self.inner.get(key).await
    }

    async fn put(&self, record: &Record) -> Result<()> {
        self.gate().await;
        self.inner.put(record).await
    }

    async fn put_if_current(&self, record: &Record, now: i64) -> Result<bool> {
        self.gate().await;
        self.inner.put_if_current(record, now).await
    }

    async fn compare_and_put(
        &self,
        record: &Record,
        expected_revision: u64,
        now: i64,
    ) -> Result<bool> {
        self.gate().await;
        self.inner.compare_and_put(record, expected_revision, now).await
    }

    async fn delete(&self, key: &AccessKey) -> Result<bool> {
        self.gate().await;
        self.inner.delete(key).await
    }

    async fn delete_if_current(&self, key: &AccessKey, created_at: i64) -> Result<bool> {
        self.gate().await;
        self.inner.delete_if_current(key, created_at).await
    }

    async fn delete_if_expired(&self, key: &AccessKey, now: i64) -> Result<bool> {
        self.gate().await;
        self.inner.delete_if_expired(key, now).await
    }

    async fn expired_as_of(&self, now: i64) -> Result<Vec<Record>> {
        self.gate().await;
        self.inner.expired_as_of(now).await
    }

    async fn count(&self) -> Result<usize> {
        self.gate().await;
        self.inner.count().await
    }
}

/// A store that fails every call with `StoreError::Unavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl FailingStore {
    fn fail<T>(op: &str) -> Result<T> {
        Err(StoreError::Unavailable(format!("{} refused: backend offline", op)))
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn insert(&self, _record: &Record, _now: i64) -> Result<InsertResult> {
        Self::fail("insert")
    }

    async fn get(&self, _key: &AccessKey) -> Result<Option<Record>> {
        Self::fail("get")
    }

    async fn put(&self, _record: &Record) -> Result<()> {
        Self::fail("put")
    }

    async fn put_if_current(&self, _record: &Record, _now: i64) -> Result<bool> {
        Self::fail("put_if_current")
    }

    async fn compare_and_put(
        &self,
        _record: &Record,
        _expected_revision: u64,
        _now: i64,
    ) -> Result<bool> {
        Self::fail("compare_and_put")
    }

    async fn delete(&self, _key: &AccessKey) -> Result<bool> {
        Self::fail("delete")
    }

    async fn delete_if_current(&self, _key: &AccessKey, _created_at: i64) -> Result<bool> {
        Self::fail("delete_if_current")
    }

    async fn delete_if_expired(&self, _key: &AccessKey, _now: i64) -> Result<bool> {
        Self::fail("delete_if_expired")
    }

    async fn expired_as_of(&self, _now: i64) -> Result<Vec<Record>> {
        Self::fail("expired_as_of")
    }

    async fn count(&self) -> Result<usize> {
        Self::fail("count")
    }
}
