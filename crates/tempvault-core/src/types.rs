//! Strong type definitions for Temp Vault.
//!
//! Both keys are newtypes. The edit key is redacted in `Debug`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Public identifier of a vault.
///
/// Caller-supplied and compared verbatim. The only constraint is that it is
/// not empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKey(String);

impl AccessKey {
    /// Validate and wrap an access key.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(CoreError::EmptyAccessKey);
        }
        Ok(Self(key))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessKey({:?})", self.0)
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccessKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccessKey {
    type Error = CoreError;

    fn try_from(key: String) -> Result<Self> {
        Self::new(key)
    }
}

impl TryFrom<&str> for AccessKey {
    type Error = CoreError;

    fn try_from(key: &str) -> Result<Self> {
        Self::new(key)
    }
}

impl From<AccessKey> for String {
    fn from(key: AccessKey) -> Self {
        key.0
    }
}

/// Secret required to mutate a vault.
///
/// Set once at creation. `Debug` is redacted; there is no `Display` or
/// `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct EditKey(String);

impl EditKey {
    /// Validate an edit key chosen at creation time.
    ///
    /// Surrounding whitespace is trimmed and a blank key is rejected.
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyEditKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a key exactly as stored, without trimming or validation. For
    /// storage backends only; new keys go through [`EditKey::new`].
    #[doc(hidden)]
    pub fn from_stored(key: String) -> Self {
        Self(key)
    }

    /// Get the key as a string slice.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EditKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EditKey(<redacted>)")
    }
}
