//! The Vault: create, read, update and expire key-addressed records.
//!
//! The Vault owns the expiry and authorization rules. The store underneath
//! only offers atomic single-record operations; every path that may hit an
//! expired record funnels through [`Vault::expire_if_due`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tempvault_core::{
    authorize, AccessKey, Clock, EditKey, Record, RecordView, RetentionPeriod, SystemClock,
};
use tempvault_store::{InsertResult, Store, StoreError};
use tracing::{debug, info, warn};

use crate::error::{Result, VaultError};

/// Configuration for the Vault.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Upper bound for each individual store call.
    pub storage_timeout: Duration,
    /// Period of the background sweeper started by [`Vault::spawn_sweeper`].
    pub sweep_interval: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(5),
            sweep_interval: Duration::from_secs(300),
        }
    }
}

impl VaultConfig {
    pub fn with_storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Outcome of checking one record against the clock.
enum Due {
    /// Not expired.
    Live(Record),
    /// Expired and removed by this call.
    Evicted,
    /// Expired, but already gone or replaced by the time we tried.
    Gone,
}

/// The main Vault struct.
///
/// Cheap to clone: the store and clock are shared behind `Arc`.
pub struct Vault<S: Store> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: VaultConfig,
}

impl<S: Store> Clone for Vault<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<S: Store> Vault<S> {
    /// Create a vault over `store` using wall-clock time.
    pub fn new(store: S, config: VaultConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    /// Create a vault with an explicit time source.
    pub fn with_clock(store: S, clock: Arc<dyn Clock>, config: VaultConfig) -> Self {
        Self {
            store: Arc::new(store),
            clock,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Current time according to the vault's clock (Unix ms).
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────────────────────

    /// Create an empty vault.
    ///
    /// Fails with `AlreadyExists` if a live vault holds `access_key`. An
    /// expired occupant is replaced.
    pub async fn create(
        &self,
        access_key: &str,
        edit_key: &str,
        retention: RetentionPeriod,
    ) -> Result<Record> {
        self.create_with_text(access_key, edit_key, retention, String::new())
            .await
    }

    /// Create a vault with initial text.
    pub async fn create_with_text(
        &self,
        access_key: &str,
        edit_key: &str,
        retention: RetentionPeriod,
        text: String,
    ) -> Result<Record> {
        let access_key = AccessKey::new(access_key)?;
        let edit_key = EditKey::new(edit_key)?;
        let now = self.now();
        let record = Record::new(access_key, edit_key, text, now, retention);

        match self
            .guarded("insert", self.store.insert(&record, now))
            .await?
        {
            InsertResult::Inserted => {
                info!(
                    access_key = %record.access_key(),
                    retention = %retention,
                    expires_at = record.expires_at(),
                    "created vault"
                );
                Ok(record)
            }
            InsertResult::AlreadyExists => {
                debug!(access_key = %record.access_key(), "create refused, vault exists");
                Err(VaultError::AlreadyExists(record.access_key().clone()))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch a vault. Expired vaults are deleted and reported as absent.
    pub async fn read(&self, access_key: &str) -> Result<Option<Record>> {
        let key = AccessKey::new(access_key)?;
        let now = self.now();

        match self.guarded("get", self.store.get(&key)).await? {
            Some(record) => self.expire_if_due(record, now).await,
            None => Ok(None),
        }
    }

    /// Fetch a display view of a vault (no edit key).
    pub async fn view(&self, access_key: &str) -> Result<Option<RecordView>> {
        let now = self.now();
        Ok(self.read(access_key).await?.map(|r| r.view(now)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace a vault's text. Last writer wins among edits to the same
    /// vault.
    ///
    /// The write only lands on the vault that was loaded: if it expired or
    /// was replaced in the meantime, nothing is written and the call fails
    /// with `Expired` or `NotFound`.
    pub async fn update(&self, access_key: &str, edit_key: &str, text: String) -> Result<Record> {
        let record = self.load_for_edit(access_key, edit_key).await?;
        let updated = record.with_text(text);
        let now = self.now();

        let written = self
            .guarded("put_if_current", self.store.put_if_current(&updated, now))
            .await?;
        if !written {
            return Err(Self::lost_edit(&updated, now));
        }

        info!(
            access_key = %updated.access_key(),
            revision = updated.revision(),
            "updated vault text"
        );
        Ok(updated)
    }

    /// Replace a vault's text only if it is still at `expected_revision`.
    pub async fn update_if_revision(
        &self,
        access_key: &str,
        edit_key: &str,
        text: String,
        expected_revision: u64,
    ) -> Result<Record> {
        let record = self.load_for_edit(access_key, edit_key).await?;
        let key = record.access_key().clone();

        if record.revision() != expected_revision {
            return Err(VaultError::Conflict {
                key,
                expected: expected_revision,
            });
        }

        let updated = record.with_text(text);
        let now = self.now();
        let swapped = self
            .guarded(
                "compare_and_put",
                self.store.compare_and_put(&updated, expected_revision, now),
            )
            .await?;

        if !swapped && updated.is_expired(now) {
            return Err(Self::lost_edit(&updated, now));
        }
        if !swapped {
            debug!(access_key = %key, expected_revision, "compare-and-swap lost");
            return Err(VaultError::Conflict {
                key,
                expected: expected_revision,
            });
        }

        info!(access_key = %key, revision = updated.revision(), "updated vault text");
        Ok(updated)
    }

    /// Delete a vault before it expires.
    pub async fn delete(&self, access_key: &str, edit_key: &str) -> Result<()> {
        let record = self.load_for_edit(access_key, edit_key).await?;
        let key = record.access_key();

        let removed = self
            .guarded(
                "delete_if_current",
                self.store.delete_if_current(key, record.created_at()),
            )
            .await?;
        if !removed {
            debug!(access_key = %key, "delete target already gone");
            return Err(VaultError::NotFound(key.clone()));
        }

        info!(access_key = %key, "deleted vault");
        Ok(())
    }

    /// Error for an edit whose vault vanished between load and write.
    fn lost_edit(record: &Record, now: i64) -> VaultError {
        let key = record.access_key().clone();
        debug!(access_key = %key, "edit target expired or was replaced");
        if record.is_expired(now) {
            VaultError::Expired(key)
        } else {
            VaultError::NotFound(key)
        }
    }

    /// Load a live record and check the edit key.
    async fn load_for_edit(&self, access_key: &str, edit_key: &str) -> Result<Record> {
        let key = AccessKey::new(access_key)?;
        let now = self.now();

        let record = self
            .guarded("get", self.store.get(&key))
            .await?
            .ok_or_else(|| VaultError::NotFound(key.clone()))?;

        let record = match self.settle(record, now).await? {
            Due::Live(record) => record,
            Due::Evicted | Due::Gone => return Err(VaultError::Expired(key)),
        };

        if !authorize(&record, edit_key) {
            warn!(access_key = %key, "edit rejected: wrong edit key");
            return Err(VaultError::Unauthorized(key));
        }

        Ok(record)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expiry
    // ─────────────────────────────────────────────────────────────────────────

    /// Return the record if it is live at `now`; otherwise delete it and
    /// return `None`.
    ///
    /// The delete is conditional on the stored record still being due, so a
    /// vault recreated under the same key in the meantime survives.
    pub async fn expire_if_due(&self, record: Record, now: i64) -> Result<Option<Record>> {
        match self.settle(record, now).await? {
            Due::Live(record) => Ok(Some(record)),
            Due::Evicted | Due::Gone => Ok(None),
        }
    }

    async fn settle(&self, record: Record, now: i64) -> Result<Due> {
        if !record.is_expired(now) {
            return Ok(Due::Live(record));
        }

        let removed = self
            .guarded(
                "delete_if_expired",
                self.store.delete_if_expired(record.access_key(), now),
            )
            .await?;

        if removed {
            debug!(
                access_key = %record.access_key(),
                expires_at = record.expires_at(),
                "removed expired vault"
            );
            Ok(Due::Evicted)
        } else {
            Ok(Due::Gone)
        }
    }

    /// Delete every vault that is due now. Returns how many this call removed.
    ///
    /// Safe to run concurrently with itself and with other operations. A
    /// failed delete does not stop the pass; the first error is returned once
    /// every candidate has been tried.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let now = self.now();
        let candidates = self
            .guarded("expired_as_of", self.store.expired_as_of(now))
            .await?;

        let mut removed = 0;
        let mut first_error = None;
        for record in candidates {
            match self.settle(record, now).await {
                Ok(Due::Evicted) => removed += 1,
                Ok(_) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if removed > 0 {
            info!(removed, "swept expired vaults");
        }
        match first_error {
            Some(e) => {
                warn!(removed, error = %e, "sweep pass incomplete");
                Err(e)
            }
            None => Ok(removed),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Presentation-facing entry points
    // ─────────────────────────────────────────────────────────────────────────

    /// Create an empty vault from a retention label such as `"24hours"`.
    pub async fn create_vault(
        &self,
        access_key: &str,
        edit_key: &str,
        retention_label: &str,
    ) -> Result<Record> {
        let retention: RetentionPeriod = retention_label.parse()?;
        self.create(access_key, edit_key, retention).await
    }

    /// Same as [`Vault::read`].
    pub async fn fetch_vault(&self, access_key: &str) -> Result<Option<Record>> {
        self.read(access_key).await
    }

    /// Same as [`Vault::update`].
    pub async fn update_vault_text(
        &self,
        access_key: &str,
        edit_key: &str,
        text: String,
    ) -> Result<Record> {
        self.update(access_key, edit_key, text).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Close the underlying store. Later operations fail with
    /// `StorageUnavailable`.
    pub async fn close(&self) -> Result<()> {
        self.guarded("close", self.store.close()).await?;
        info!("vault closed");
        Ok(())
    }

    /// Bound a store call by the configured timeout.
    async fn guarded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = tempvault_store::Result<T>>,
    {
        let after = self.config.storage_timeout;
        match tokio::time::timeout(after, fut).await {
            Ok(result) => result.map_err(|e| {
                warn!(op, error = %e, "store call failed");
                VaultError::StorageUnavailable(e)
            }),
            Err(_) => {
                warn!(op, ?after, "store call timed out");
                Err(VaultError::StorageUnavailable(StoreError::Timeout { op, after }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempvault_core::ManualClock;
    use tempvault_store::MemoryStore;

    fn vault_at(now: i64) -> (Vault<MemoryStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let vault = Vault::with_clock(MemoryStore::new(), clock.clone(), VaultConfig::default());
        (vault, clock)
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let (vault, _clock) = vault_at(10_000);
        let created = vault
            .create("abc", "secret", RetentionPeriod::EightHours)
            .await
            .unwrap();

        let read = vault.read("abc").await.unwrap().unwrap();
        assert_eq!(read, created);
        assert_eq!(read.text(), "");
        assert_eq!(read.created_at(), 10_000);
        assert_eq!(read.expires_at(), 10_000 + 28_800_000);
    }

    #[tokio::test]
    async fn test_edit_key_trimmed_on_create() {
        let (vault, _clock) = vault_at(0);
        vault
            .create("abc", "  secret  ", RetentionPeriod::OneHour)
            .await
            .unwrap();

        vault.update("abc", "secret", "x".into()).await.unwrap();
        let err = vault
            .update("abc", "  secret  ", "y".into())
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_rejects_blank_keys() {
        let (vault, _clock) = vault_at(0);

        let err = vault
            .create("", "secret", RetentionPeriod::OneHour)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::InvalidKey(_)));

        let err = vault
            .create("abc", "   ", RetentionPeriod::OneHour)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::InvalidKey(_)));
        assert!(vault.read("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_view_hides_edit_key() {
        let (vault, clock) = vault_at(0);
        vault
            .create("abc", "secret", RetentionPeriod::OneHour)
            .await
            .unwrap();
        clock.set(600_000);

        let view = vault.view("abc").await.unwrap().unwrap();
        assert_eq!(view.remaining_ms, 3_000_000);
        assert_eq!(view.access_key.as_str(), "abc");
    }

    #[tokio::test]
    async fn test_expire_if_due_keeps_recreated_vault() {
        let (vault, clock) = vault_at(0);
        let stale = vault
            .create("abc", "old", RetentionPeriod::OneHour)
            .await
            .unwrap();

        clock.set(3_600_000);
        let fresh = vault
            .create("abc", "new", RetentionPeriod::OneHour)
            .await
            .unwrap();

        // A sweep holding the stale copy must not remove the fresh vault.
        assert!(vault.expire_if_due(stale, 3_600_000).await.unwrap().is_none());
        let stored = vault.read("abc").await.unwrap().unwrap();
        assert_eq!(stored, fresh);
    }
}
