//! The vault record and its display view.

use serde::{Deserialize, Serialize};

use crate::retention::{compute_expiry, RetentionPeriod};
use crate::types::{AccessKey, EditKey};

/// A stored vault.
///
/// Everything except `text` and `revision` is fixed at creation. The only
/// way to change the text is [`Record::with_text`], which the vault calls
/// after an edit-key check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    access_key: AccessKey,
    edit_key: EditKey,
    text: String,
    created_at: i64,
    retention: RetentionPeriod,
    expires_at: i64,
    revision: u64,
}

impl Record {
    /// Create a fresh record. `expires_at` is derived from `retention`.
    pub fn new(
        access_key: AccessKey,
        edit_key: EditKey,
        text: String,
        created_at: i64,
        retention: RetentionPeriod,
    ) -> Self {
        Self {
            access_key,
            edit_key,
            text,
            created_at,
            retention,
            expires_at: compute_expiry(created_at, retention),
            revision: 0,
        }
    }

    /// Rebuild a record from persisted fields. For storage backends only.
    ///
    /// Nothing is re-derived or checked: `expires_at` and `revision` are
    /// taken as written. Everything else should use [`Record::new`].
    #[doc(hidden)]
    pub fn restore(
        access_key: AccessKey,
        edit_key: EditKey,
        text: String,
        created_at: i64,
        retention: RetentionPeriod,
        expires_at: i64,
        revision: u64,
    ) -> Self {
        Self {
            access_key,
            edit_key,
            text,
            created_at,
            retention,
            expires_at,
            revision,
        }
    }

    pub fn access_key(&self) -> &AccessKey {
        &self.access_key
    }

    pub fn edit_key(&self) -> &EditKey {
        &self.edit_key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn retention(&self) -> RetentionPeriod {
        self.retention
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Number of text updates applied since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the record is logically absent at `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Milliseconds left before expiry, zero once due.
    pub fn remaining_ms(&self, now: i64) -> i64 {
        self.expires_at.saturating_sub(now).max(0)
    }

    /// The same record with new text and the next revision.
    #[must_use]
    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self.revision += 1;
        self
    }

    /// A snapshot safe to hand to a display layer.
    pub fn view(&self, now: i64) -> RecordView {
        RecordView {
            access_key: self.access_key.clone(),
            text: self.text.clone(),
            created_at: self.created_at,
            retention: self.retention,
            expires_at: self.expires_at,
            remaining_ms: self.remaining_ms(now),
            revision: self.revision,
        }
    }
}

/// Display snapshot of a record. Never carries the edit key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub access_key: AccessKey,
    pub text: String,
    pub created_at: i64,
    pub retention: RetentionPeriod,
    pub expires_at: i64,
    pub remaining_ms: i64,
    pub revision: u64,
}
