//! In-memory implementation of the Store trait.
//!
//! Same semantics as SQLite but keeps everything in memory with no
//! persistence. Useful for tests and single-process deployments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tempvault_core::{AccessKey, Record};

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; each
/// method holds the lock for its whole read-modify-write so single-key
/// operations are atomic.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<AccessKey, Record>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<AccessKey, Record>>> {
        self.ensure_open()?;
        self.records
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<AccessKey, Record>>> {
        self.ensure_open()?;
        self.records
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("store is closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, record: &Record, now: i64) -> Result<InsertResult> {
        let mut records = self.write()?;

        if let Some(existing) = records.get(record.access_key()) {
            if !existing.is_expired(now) {
                return Ok(InsertResult::AlreadyExists);
            }
        }

        records.insert(record.access_key().clone(), record.clone());
        Ok(InsertResult::Inserted)
    }

    async fn get(&self, key: &AccessKey) -> Result<Option<Record>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn put(&self, record: &Record) -> Result<()> {
        self.write()?
            .insert(record.access_key().clone(), record.clone());
        Ok(())
    }

    async fn put_if_current(&self, record: &Record, now: i64) -> Result<bool> {
        let mut records = self.write()?;

        match records.get_mut(record.access_key()) {
            Some(existing)
                if existing.created_at() == record.created_at() && !existing.is_expired(now) =>
            {
                *existing = record.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn compare_and_put(
        &self,
        record: &Record,
        expected_revision: u64,
        now: i64,
    ) -> Result<bool> {
        let mut records = self.write()?;

        match records.get_mut(record.access_key()) {
            Some(existing)
                if existing.created_at() == record.created_at()
                    && existing.revision() == expected_revision
                    && !existing.is_expired(now) =>
            {
                *existing = record.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &AccessKey) -> Result<bool> {
        Ok(self.write()?.remove(key).is_some())
    }

    async fn delete_if_current(&self, key: &AccessKey, created_at: i64) -> Result<bool> {
        let mut records = self.write()?;

        match records.get(key) {
            Some(existing) if existing.created_at() == created_at => {
                records.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_expired(&self, key: &AccessKey, now: i64) -> Result<bool> {
        let mut records = self.write()?;

        match records.get(key) {
            Some(existing) if existing.is_expired(now) => {
                records.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn expired_as_of(&self, now: i64) -> Result<Vec<Record>> {
        Ok(self
            .read()?
            .values()
            .filter(|r| r.is_expired(now))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
