//! Edit-key access control.
//!
//! Possession of the edit key is the only credential. There is no rate
//! limiting and no lockout.

use crate::record::Record;

/// Whether `supplied` grants write access to `record`.
///
/// Exact, case-sensitive string equality with no normalization. Both sides
/// are hashed with BLAKE3 first so the comparison runs in constant time.
pub fn authorize(record: &Record, supplied: &str) -> bool {
    blake3::hash(record.edit_key().expose().as_bytes()) == blake3::hash(supplied.as_bytes())
}
