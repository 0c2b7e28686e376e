//! In-memory key-value backend.
//!
//! Backs tests and the `memory` store backend in development. A BTreeMap
//! keeps keys ordered so prefix scans match the PostgreSQL backend's
//! iteration order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::kv::{KvStore, StoreError, VersionedValue, CAS_CREATE};

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<String, VersionedValue>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let version = entries.get(key).map(|v| v.version + 1).unwrap_or(1);
        entries.insert(key.to_string(), VersionedValue { version, value });
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: i64,
        value: Value,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            None if expected_version == CAS_CREATE => {
                entries.insert(key.to_string(), VersionedValue { version: 1, value });
                Ok(true)
            }
            Some(current) if current.version == expected_version => {
                entries.insert(
                    key.to_string(),
                    VersionedValue {
                        version: expected_version + 1,
                        value,
                    },
                );
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
