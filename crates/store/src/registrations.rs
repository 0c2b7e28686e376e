//! Typed registration repository over the key-value store.
//!
//! Key scheme:
//! - `earlybird:<email>` — the registration record (email lowercased)
//! - `earlybird:list:<timestamp>` — append-only log duplicate
//! - `earlybird:counter:<YYYY-MM-DD>` — daily signup counter
//!
//! Counter and referral-count writes go through a bounded
//! compare-and-swap loop so concurrent increments cannot lose updates.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use domain::models::Registration;

use crate::kv::{KvStore, StoreError, CAS_CREATE};
use crate::metrics::OpTimer;

pub const REGISTRATION_PREFIX: &str = "earlybird:";
pub const LIST_PREFIX: &str = "earlybird:list:";
pub const COUNTER_PREFIX: &str = "earlybird:counter:";

/// Retries before an optimistic write gives up.
const MAX_CAS_ATTEMPTS: usize = 16;

#[derive(Debug, Serialize, Deserialize)]
struct CounterRecord {
    count: i64,
}

/// Repository for registration-related store operations.
#[derive(Clone)]
pub struct RegistrationStore {
    kv: Arc<dyn KvStore>,
}

impl RegistrationStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Store key for a registration record.
    pub fn registration_key(email: &str) -> String {
        format!("{REGISTRATION_PREFIX}{}", email.to_lowercase())
    }

    /// Store key for a list-log entry.
    pub fn list_key(timestamp: &DateTime<Utc>) -> String {
        format!("{LIST_PREFIX}{}", timestamp.to_rfc3339())
    }

    /// Store key for a daily signup counter.
    pub fn counter_key(date: NaiveDate) -> String {
        format!("{COUNTER_PREFIX}{}", date.format("%Y-%m-%d"))
    }

    /// Looks up a registration record by (case-insensitive) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, StoreError> {
        let timer = OpTimer::new("find_by_email");
        let stored = self.kv.get(&Self::registration_key(email)).await;
        timer.record();

        stored?
            .map(|v| serde_json::from_value(v.value).map_err(StoreError::from))
            .transpose()
    }

    /// Persists a new registration record under its email key.
    pub async fn insert_record(&self, record: &Registration) -> Result<(), StoreError> {
        let timer = OpTimer::new("insert_record");
        let result = self
            .kv
            .set(
                &Self::registration_key(&record.email),
                serde_json::to_value(record)?,
            )
            .await;
        timer.record();
        result
    }

    /// Appends the duplicate list-log entry for admin enumeration.
    pub async fn append_log_entry(&self, record: &Registration) -> Result<(), StoreError> {
        let timer = OpTimer::new("append_log_entry");
        let result = self
            .kv
            .set(
                &Self::list_key(&record.timestamp),
                serde_json::to_value(record)?,
            )
            .await;
        timer.record();
        result
    }

    /// Scans every registration record (excluding list-log entries and
    /// counters).
    pub async fn all_registrations(&self) -> Result<Vec<Registration>, StoreError> {
        let timer = OpTimer::new("all_registrations");
        let scanned = self.kv.get_by_prefix(REGISTRATION_PREFIX).await;
        timer.record();

        scanned?
            .into_iter()
            .filter(|(key, _)| !key.starts_with(LIST_PREFIX) && !key.starts_with(COUNTER_PREFIX))
            .map(|(_, v)| serde_json::from_value(v.value).map_err(StoreError::from))
            .collect()
    }

    /// Resolves a referral code to its owner by a linear scan of all
    /// registration records.
    pub async fn find_by_referral_code(
        &self,
        code: &str,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .all_registrations()
            .await?
            .into_iter()
            .find(|record| record.referral_code == code))
    }

    /// Whether any existing record already holds the given referral code.
    pub async fn referral_code_in_use(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_referral_code(code).await?.is_some())
    }

    /// Increments a registrant's referral count by exactly one.
    ///
    /// Runs a compare-and-swap loop so two referrals landing at the same
    /// time both count. Returns the new count.
    pub async fn increment_referral_count(&self, email: &str) -> Result<i64, StoreError> {
        let key = Self::registration_key(email);
        for _ in 0..MAX_CAS_ATTEMPTS {
            let stored = self
                .kv
                .get(&key)
                .await?
                .ok_or_else(|| StoreError::MissingRecord(key.clone()))?;
            let mut record: Registration = serde_json::from_value(stored.value)?;
            record.referral_count += 1;
            let new_count = record.referral_count;

            let timer = OpTimer::new("increment_referral_count");
            let swapped = self
                .kv
                .compare_and_swap(&key, stored.version, serde_json::to_value(&record)?)
                .await;
            timer.record();

            if swapped? {
                return Ok(new_count);
            }
            warn!(key = %key, "referral count CAS lost, retrying");
        }
        Err(StoreError::Contention(key))
    }

    /// Returns all list-log entries in key order.
    pub async fn list_log_entries(&self) -> Result<Vec<Registration>, StoreError> {
        let timer = OpTimer::new("list_log_entries");
        let scanned = self.kv.get_by_prefix(LIST_PREFIX).await;
        timer.record();

        scanned?
            .into_iter()
            .map(|(_, v)| serde_json::from_value(v.value).map_err(StoreError::from))
            .collect()
    }

    /// Bumps the signup counter for the given calendar day, creating it at
    /// 1 when the day rolls over. Returns the new count.
    pub async fn increment_daily_counter(&self, date: NaiveDate) -> Result<i64, StoreError> {
        let key = Self::counter_key(date);
        for _ in 0..MAX_CAS_ATTEMPTS {
            match self.kv.get(&key).await? {
                None => {
                    let value = serde_json::to_value(CounterRecord { count: 1 })?;
                    if self.kv.compare_and_swap(&key, CAS_CREATE, value).await? {
                        return Ok(1);
                    }
                }
                Some(stored) => {
                    let counter: CounterRecord = serde_json::from_value(stored.value)?;
                    let next = counter.count + 1;
                    let value = serde_json::to_value(CounterRecord { count: next })?;
                    if self
                        .kv
                        .compare_and_swap(&key, stored.version, value)
                        .await?
                    {
                        return Ok(next);
                    }
                }
            }
            warn!(key = %key, "daily counter CAS lost, retrying");
        }
        Err(StoreError::Contention(key))
    }

    /// Reads the signup counter for the given day (absent reads as 0).
    pub async fn daily_count(&self, date: NaiveDate) -> Result<i64, StoreError> {
        match self.kv.get(&Self::counter_key(date)).await? {
            Some(stored) => {
                let counter: CounterRecord = serde_json::from_value(stored.value)?;
                Ok(counter.count)
            }
            None => Ok(0),
        }
    }
}
