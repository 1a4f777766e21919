//! Response Cache Module
//!
//! Fingerprint-keyed store of decoded upstream responses with per-entry TTL.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheKey, CacheStats};

/// Response cache shared between the client and the sweep task.
pub type SharedCache = Arc<RwLock<ResponseCache>>;

// == Response Cache ==
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, CacheEntry>,
    stats: CacheStats,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    /// Wraps a new cache for sharing across tasks.
    pub fn shared(default_ttl: Duration) -> SharedCache {
        Arc::new(RwLock::new(Self::new(default_ttl)))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Returns the cached value if present, unexpired, and of type `T`.
    ///
    /// An expired entry is removed as a side effect. An entry holding a
    /// different type is left in place and reported as a miss.
    pub fn get<T>(&mut self, key: &CacheKey) -> Option<T>
    where
        T: Any + Clone,
    {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        match entry.downcast::<T>() {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                tracing::warn!(key = %key, "cached value has unexpected type");
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// Uses the default TTL when `ttl` is `None`.
    pub fn set<T>(&mut self, key: CacheKey, value: T, ttl: Option<Duration>)
    where
        T: Any + Send + Sync,
    {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    /// Stores a pre-built entry.
    pub fn insert_entry(&mut self, key: CacheKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    // == Delete ==
    /// Removes an entry. Returns whether it existed.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Sweep ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
