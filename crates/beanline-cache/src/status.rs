//! Cache lookup status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Entry present and younger than the max age.
    Hit,
    /// Entry present but too old to serve without a fetch.
    Stale,
    /// No entry for the key.
    Miss,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Stale => write!(f, "STALE"),
            Self::Miss => write!(f, "MISS"),
        }
    }
}

/// Result of a cache lookup with the payload, when present.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub status: CacheStatus,
    pub payload: Option<Value>,
}

impl CacheLookup {
    pub fn hit(payload: Value) -> Self {
        Self {
            status: CacheStatus::Hit,
            payload: Some(payload),
        }
    }

    pub fn stale(payload: Value) -> Self {
        Self {
            status: CacheStatus::Stale,
            payload: Some(payload),
        }
    }

    pub fn miss() -> Self {
        Self {
            status: CacheStatus::Miss,
            payload: None,
        }
    }

    /// Payload only if the lookup was a fresh hit.
    pub fn fresh(self) -> Option<Value> {
        match self.status {
            CacheStatus::Hit => self.payload,
            _ => None,
        }
    }
}
