//! # Temp Vault
//!
//! Ephemeral, key-addressed text vaults with TTL expiry and edit-key access
//! control.
//!
//! ## Overview
//!
//! - **Access key**: public identifier that locates a vault, like a room name
//! - **Edit key**: secret required to change or delete a vault
//! - **Retention**: one of a fixed set of labels (`1hour` .. `1week`) that
//!   fixes `expires_at` at creation
//! - **Lazy expiry**: every read checks `now >= expires_at`, deletes the
//!   record if due and reports it as absent
//! - **Sweep**: optional bulk removal of every due vault, on demand or from a
//!   background task
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempvault::{RetentionPeriod, Vault, VaultConfig};
//! use tempvault::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("vault.db").unwrap();
//!     let vault = Vault::new(store, VaultConfig::default());
//!     let sweeper = vault.spawn_sweeper();
//!
//!     vault
//!         .create("my-room", "edit-secret", RetentionPeriod::TwentyFourHours)
//!         .await
//!         .unwrap();
//!
//!     vault
//!         .update("my-room", "edit-secret", "hello".to_string())
//!         .await
//!         .unwrap();
//!
//!     let record = vault.read("my-room").await.unwrap();
//!     assert_eq!(record.unwrap().text(), "hello");
//!
//!     sweeper.shutdown().await;
//!     vault.close().await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `tempvault::core` - Records, keys, retention policy, clocks
//! - `tempvault::store` - Storage abstraction, SQLite and in-memory stores

pub mod error;
pub mod sweeper;
pub mod vault;

// Re-export component crates
pub use tempvault_core as core;
pub use tempvault_store as store;

// Re-export main types for convenience
pub use error::{Result, VaultError};
pub use sweeper::SweeperHandle;
pub use vault::{Vault, VaultConfig};

// Re-export commonly used core types
pub use tempvault_core::{
    AccessKey, Clock, EditKey, ManualClock, Record, RecordView, RetentionPeriod, SystemClock,
};
