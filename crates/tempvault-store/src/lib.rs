//! # Temp Vault Store
//!
//! Storage abstraction for Temp Vault. Provides a trait-based interface for
//! record persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The [`Store`] trait is the persistence collaborator the vault talks to.
//! It knows nothing about edit keys or lazy expiry policy; it only offers
//! atomic single-record operations and the expired-record query used by the
//! sweep.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests and single-process use
//! - [`InsertResult`] - Result of the create-path insert
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempvault_store::{SqliteStore, Store};
//! use tempvault_core::AccessKey;
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("vault.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let key = AccessKey::new("my-room").unwrap();
//!     let record = store.get(&key).await.unwrap();
//!     assert!(record.is_none());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Insert never clobbers a live record**: `insert` replaces an existing
//!   record only if it is already due at the supplied `now`.
//! - **Conditional deletes**: `delete_if_expired` re-checks expiry inside the
//!   store, so a sweep never removes a record recreated under the same key.
//! - **Writes are bound to one creation**: `put_if_current`,
//!   `compare_and_put` and `delete_if_current` match on `created_at`, so an
//!   edit loaded before a vault expired cannot touch a vault re-created
//!   under the same key.
//! - **Compare-and-swap**: `compare_and_put` also requires the stored
//!   revision to match.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, Store};
