//! Cache entries.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

/// A payload stored after a successful fetch.
///
/// Only ever built from a fully validated response, so a stored entry is
/// never partial.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Endpoint key (may include a query string).
    pub key: String,
    /// Last successfully fetched body.
    pub payload: Value,
    /// Monotonic fetch time, used for freshness.
    pub fetched_at: Instant,
    /// Wall-clock fetch time, for display.
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
            fetched_at: Instant::now(),
            stored_at: Utc::now(),
        }
    }

    /// Time since the payload was fetched.
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Whether the entry is strictly younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() < max_age
    }

    /// Summary for tooling.
    pub fn info(&self) -> CacheEntryInfo {
        CacheEntryInfo {
            key: self.key.clone(),
            age_ms: self.age().as_millis() as u64,
            stored_at: self.stored_at,
            bytes: self.payload.to_string().len(),
        }
    }
}

/// Serializable description of a cache entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryInfo {
    pub key: String,
    pub age_ms: u64,
    pub stored_at: DateTime<Utc>,
    pub bytes: usize,
}
