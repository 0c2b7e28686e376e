//! The key-value store abstraction backing all registration data.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A stored JSON value with its write version.
///
/// Versions start at 1 on first write and increase by one on every
/// overwrite; they exist so callers can do optimistic-concurrency updates
/// through [`KvStore::compare_and_swap`].
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    pub version: i64,
    pub value: Value,
}

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("stored value could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("write contention exhausted retries for key {0}")]
    Contention(String),

    #[error("no record stored under key {0}")]
    MissingRecord(String),
}

/// Expected version passed to [`KvStore::compare_and_swap`] when the key
/// must not exist yet (create-if-absent).
pub const CAS_CREATE: i64 = 0;

/// Generic get/set/prefix-scan store with one optimistic-concurrency
/// primitive.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError>;

    /// Upserts `value` under `key`, bumping the version on overwrite.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Writes `value` under `key` only if the stored version is still
    /// `expected_version` ([`CAS_CREATE`] means "only if absent").
    ///
    /// Returns whether the write happened.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: i64,
        value: Value,
    ) -> Result<bool, StoreError>;

    /// Returns all entries whose key starts with `prefix`, ordered by key.
    async fn get_by_prefix(&self, prefix: &str)
        -> Result<Vec<(String, VersionedValue)>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Backend("connection refused".into()).to_string(),
            "store backend error: connection refused"
        );
        assert_eq!(
            StoreError::Contention("earlybird:a@x.com".into()).to_string(),
            "write contention exhausted retries for key earlybird:a@x.com"
        );
        assert_eq!(
            StoreError::MissingRecord("earlybird:a@x.com".into()).to_string(),
            "no record stored under key earlybird:a@x.com"
        );
    }
}
