//! Endpoint-keyed content cache.

use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;

use crate::{CacheEntry, CacheEntryInfo, CacheLookup};

/// In-memory cache of fetched payloads, keyed by endpoint string.
///
/// Writes replace whole entries. Readers never observe a partially
/// written payload.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<String, CacheEntry>,
}

impl ContentCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, classifying the entry against `max_age`.
    pub fn lookup(&self, key: &str, max_age: Duration) -> CacheLookup {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(max_age) => CacheLookup::hit(entry.payload.clone()),
            Some(entry) => CacheLookup::stale(entry.payload.clone()),
            None => CacheLookup::miss(),
        }
    }

    /// Payload for `key` regardless of age.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|e| e.payload.clone())
    }

    /// Full entry for `key`.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|e| e.clone())
    }

    /// Store a payload, replacing any previous entry for `key`.
    pub fn insert(&self, key: impl Into<String>, payload: Value) {
        let key = key.into();
        self.entries.insert(key.clone(), CacheEntry::new(key, payload));
    }

    /// Remove one entry. Returns whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Descriptions of all entries, sorted by key.
    pub fn snapshot(&self) -> Vec<CacheEntryInfo> {
        let mut infos: Vec<CacheEntryInfo> = self.entries.iter().map(|e| e.info()).collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        infos
    }
}
