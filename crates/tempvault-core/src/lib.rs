//! # Temp Vault Core
//!
//! Pure primitives for Temp Vault: records, keys, the retention policy and
//! edit-key access control.
//!
//! This crate contains no I/O, no storage, no async. Time enters only through
//! the [`Clock`] trait so callers (and tests) decide what "now" means.
//!
//! ## Key Types
//!
//! - [`AccessKey`] - Public identifier of a vault (the "room name")
//! - [`EditKey`] - Secret required to mutate a vault
//! - [`Record`] - The stored vault with its expiry timestamps
//! - [`RetentionPeriod`] - Closed set of retention labels
//!
//! ## Expiry
//!
//! A record is logically absent once `now >= expires_at`. See
//! [`Record::is_expired`].

pub mod access;
pub mod clock;
pub mod error;
pub mod record;
pub mod retention;
pub mod types;

pub use access::authorize;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result};
pub use record::{Record, RecordView};
pub use retention::{compute_expiry, RetentionPeriod};
pub use types::{AccessKey, EditKey};
