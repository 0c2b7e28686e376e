//! PostgreSQL key-value backend.
//!
//! All data lives in one `kv_store` table (key, JSONB value, version). The
//! version column carries the optimistic-concurrency contract of
//! [`KvStore::compare_and_swap`]: a swap is a single conditional UPDATE.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::kv::{KvStore, StoreError, VersionedValue, CAS_CREATE};
use crate::metrics::OpTimer;

/// Connection settings for the PostgreSQL backend.
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Creates a PostgreSQL connection pool with the given configuration.
pub async fn create_pool(config: &PgStoreConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
}

#[derive(Clone)]
pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Escapes LIKE metacharacters so a prefix matches literally.
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        let timer = OpTimer::new("kv_get");
        let row = sqlx::query(
            r#"
            SELECT value, version
            FROM kv_store
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(row?.map(|row| VersionedValue {
            version: row.get("version"),
            value: row.get("value"),
        }))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let timer = OpTimer::new("kv_set");
        let result = sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, version, updated_at)
            VALUES ($1, $2, 1, now())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                version = kv_store.version + 1,
                updated_at = now()
            "#,
        )
        .bind(key)
        .bind(&value)
        .execute(&self.pool)
        .await;
        timer.record();

        result?;
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: i64,
        value: Value,
    ) -> Result<bool, StoreError> {
        let timer = OpTimer::new("kv_compare_and_swap");
        let result = if expected_version == CAS_CREATE {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, version, updated_at)
                VALUES ($1, $2, 1, now())
                ON CONFLICT (key) DO NOTHING
                "#,
            )
            .bind(key)
            .bind(&value)
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r#"
                UPDATE kv_store
                SET value = $2,
                    version = version + 1,
                    updated_at = now()
                WHERE key = $1 AND version = $3
                "#,
            )
            .bind(key)
            .bind(&value)
            .bind(expected_version)
            .execute(&self.pool)
            .await
        };
        timer.record();

        Ok(result?.rows_affected() == 1)
    }

    async fn get_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        let timer = OpTimer::new("kv_get_by_prefix");
        let rows = sqlx::query(
            r#"
            SELECT key, value, version
            FROM kv_store
            WHERE key LIKE $1
            ORDER BY key
            "#,
        )
        .bind(format!("{}%", escape_like(prefix)))
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(rows?
            .into_iter()
            .map(|row| {
                (
                    row.get("key"),
                    VersionedValue {
                        version: row.get("version"),
                        value: row.get("value"),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passthrough() {
        assert_eq!(escape_like("earlybird:list:"), "earlybird:list:");
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("a%b"), "a\\%b");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
