//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::future::Future;
use std::sync::Arc;

use tempvault::{Vault, VaultConfig};
use tempvault_core::ManualClock;
use tempvault_store::{MemoryStore, SqliteStore, Store};

/// A vault over an in-memory store with a clock the test controls.
pub struct TestFixture<S: Store = MemoryStore> {
    pub vault: Vault<S>,
    pub clock: Arc<ManualClock>,
}

impl TestFixture<MemoryStore> {
    /// Fixture with an empty `MemoryStore`, clock frozen at `now`.
    pub fn at(now: i64) -> Self {
        Self::with_store(MemoryStore::new(), now)
    }
}

impl TestFixture<SqliteStore> {
    /// Fixture with an in-memory SQLite database, clock frozen at `now`.
    pub fn sqlite_at(now: i64) -> Self {
        let store = SqliteStore::open_memory().expect("open in-memory sqlite");
        Self::with_store(store, now)
    }
}

impl<S: Store> TestFixture<S> {
    /// Fixture over any store with default config.
    pub fn with_store(store: S, now: i64) -> Self {
        Self::with_config(store, now, VaultConfig::default())
    }

    /// Fixture over any store with explicit config.
    pub fn with_config(store: S, now: i64, config: VaultConfig) -> Self {
        let clock = Arc::new(ManualClock::new(now));
        let vault = Vault::with_clock(store, clock.clone(), config);
        Self { vault, clock }
    }
}

impl Default for TestFixture<MemoryStore> {
    fn default() -> Self {
        Self::at(0)
    }
}

/// Run a future to completion on a fresh current-thread runtime.
///
/// For use inside `proptest!` bodies, which are synchronous.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build tokio runtime")
        .block_on(fut)
}
