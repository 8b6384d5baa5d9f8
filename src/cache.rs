use serde_json::Value;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};
use std::time::{Duration, Instant};

use crate::config;

/// In-memory TTL cache for hot catalog responses (subject and test listings).
/// Entries past their TTL read as misses; writers from the admin surface
/// invalidate explicitly so stale listings never outlive a content change.
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

struct CacheEntry {
    inserted_at: Instant,
    value: Value,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.into(),
                CacheEntry {
                    inserted_at: Instant::now(),
                    value,
                },
            );
        }
    }

    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Drop every entry whose key starts with the prefix. Used when a write
    /// affects a family of keys (e.g. per-category test listings).
    pub fn invalidate_prefix(&self, prefix: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|key, _| !key.starts_with(prefix));
        }
    }
}

/// Process-wide cache instance, TTL taken from configuration.
pub fn cache() -> &'static TtlCache {
    static CACHE: OnceLock<TtlCache> = OnceLock::new();
    CACHE.get_or_init(|| TtlCache::new(Duration::from_secs(config::config().cache.ttl_secs)))
}

/// Whether response caching is enabled at all.
pub fn enabled() -> bool {
    config::config().cache.enabled
}
