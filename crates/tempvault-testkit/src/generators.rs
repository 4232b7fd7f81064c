//! Proptest generators for property-based testing.

use proptest::prelude::*;

use tempvault_core::RetentionPeriod;

/// Generate a non-empty access key.
pub fn access_key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}".prop_map(String::from)
}

/// Generate an edit key with no surrounding whitespace.
pub fn edit_key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%^&*]{1,24}".prop_map(String::from)
}

/// Generate arbitrary vault text, including empty and non-ASCII.
pub fn text() -> impl Strategy<Value = String> {
    any::<String>().prop_filter("keep text reasonably small", |s| s.len() <= 2048)
}

/// Generate a retention period.
pub fn retention_period() -> impl Strategy<Value = RetentionPeriod> {
    prop::sample::select(RetentionPeriod::ALL.to_vec())
}

/// Generate a reasonable creation timestamp (1970 .. 2100, Unix ms).
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000i64
}

/// Parameters for creating a vault.
#[derive(Debug, Clone)]
pub struct VaultParams {
    pub access_key: String,
    pub edit_key: String,
    pub retention: RetentionPeriod,
    pub created_at: i64,
}

impl Arbitrary for VaultParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (access_key(), edit_key(), retention_period(), timestamp())
            .prop_map(|(access_key, edit_key, retention, created_at)| VaultParams {
                access_key,
                edit_key,
                retention,
                created_at,
            })
            .boxed()
    }
}
