//! Response cache for read-mostly queries.
//!
//! Entries are raw JSON bodies keyed by endpoint path plus request body, each
//! with its own freshness window. A forced logout clears the whole cache so
//! no data from the dead session outlives it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Categories and cities change rarely.
pub const REFERENCE_TTL: Duration = Duration::from_secs(10 * 60);
/// Product and order listings.
pub const LIST_TTL: Duration = Duration::from_secs(5 * 60);
/// A single product's detail view.
pub const DETAIL_TTL: Duration = Duration::from_secs(30);

struct Entry {
    stored_at: Instant,
    ttl: Duration,
    value: Value,
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let fresh = entries.get(key).is_some_and(|e| now.duration_since(e.stored_at) < e.ttl);
        if !fresh {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|e| e.value.clone())
    }

    pub fn insert(&self, key: String, ttl: Duration, value: Value) {
        self.insert_at(key, ttl, value, Instant::now());
    }

    fn insert_at(&self, key: String, ttl: Duration, value: Value, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key, Entry { stored_at: now, ttl, value });
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.retain(|key, _| !key.starts_with(prefix));
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "query cache cleared");
        }
        entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
