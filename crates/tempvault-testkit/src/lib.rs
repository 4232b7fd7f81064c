//! # Temp Vault Testkit
//!
//! Testing utilities for Temp Vault.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a vault wired to a manual clock, for time-travel tests
//! - **Generators**: Proptest strategies for keys, text and retention labels
//! - **Faults**: stores that hang or fail, for timeout and outage tests
//!
//! ## Test Fixtures
//!
//! ```rust
//! use tempvault_testkit::TestFixture;
//! use tempvault::RetentionPeriod;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let fixture = TestFixture::at(0);
//! fixture.vault.create("room", "key", RetentionPeriod::OneHour).await.unwrap();
//!
//! fixture.clock.set(3_600_000);
//! assert!(fixture.vault.read("room").await.unwrap().is_none());
//! # });
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tempvault_testkit::generators::{access_key, retention_period};
//!
//! proptest! {
//!     #[test]
//!     fn expiry_follows_label(key in access_key(), period in retention_period()) {
//!         // ...
//!     }
//! }
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;

pub use faults::{FailingStore, StallingStore};
pub use fixtures::{block_on, TestFixture};
