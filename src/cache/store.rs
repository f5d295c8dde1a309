//! Cache Store Module
//!
//! Bounded key-value store with per-entry TTL, lazy expiry and
//! oldest-created eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, CreationOrder, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};

/// Cache store shared across every caller in the process.
pub type SharedCache<T> = Arc<RwLock<CacheStore<T>>>;

// == Cache Store ==
/// Generic response cache.
///
/// Expired entries are never swept proactively by the store itself: every read
/// path (`get`, `has`) treats them as absent and removes them on touch.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Creation order for eviction
    order: CreationOrder,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL used when `set` is called without one
    default_ttl: Duration,
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}

impl<T> CacheStore<T> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: CreationOrder::new(),
            max_entries,
            default_ttl,
        }
    }

    /// Wraps the store in the shared handle callers pass around.
    pub fn shared(self) -> SharedCache<T> {
        Arc::new(RwLock::new(self))
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// When a new key arrives at capacity, the oldest-created entry is evicted
    /// first, so the store never holds more than `max_entries`. An overwrite
    /// recreates the entry with a fresh creation time and TTL.
    pub fn set(&mut self, key: String, value: T, ttl: Option<Duration>) {
        if self.max_entries == 0 {
            debug!("Cache disabled (max_entries = 0), dropping key: {}", key);
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.order.pop_oldest() {
                self.entries.remove(&evicted);
                debug!("Evicted oldest cache entry: {}", evicted);
            }
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.order.record(&key);
        debug!("Stored in cache with key: {} (ttl {:?})", key, ttl);
    }

    // == Has ==
    /// Presence check with the same expiry semantics as `get`, without
    /// counting a hit.
    pub fn has(&mut self, key: &str) -> bool {
        self.live_entry(key).is_some()
    }

    // == Delete ==
    /// Removes `key`; a missing key is not an error.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.remove(key);
        }
        removed
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        debug!("Cache cleared");
    }

    // == Invalidate Pattern ==
    /// Removes every key for which `matcher` returns true.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern<F>(&mut self, matcher: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| matcher(key))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.order.remove(key);
        }

        debug!("Invalidated {} cache entries by pattern", doomed.len());
        doomed.len()
    }

    // == Purge Expired ==
    /// Removes all expired entries in one pass.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.order.remove(key);
        }

        expired.len()
    }

    // == Stats ==
    /// Returns a snapshot of the cache; never mutates state.
    pub fn stats(&self) -> CacheStats {
        let total_hits = self.entries.values().map(|entry| entry.hits).sum();
        CacheStats::new(self.entries.len(), self.max_entries, total_hits)
    }

    // == Length ==
    /// Number of entries held, including expired ones not yet touched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Looks up a non-expired entry, removing it if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&mut CacheEntry<T>> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.entries.remove(key);
            self.order.remove(key);
            debug!("Cache expired for key: {}", key);
            return None;
        }
        self.entries.get_mut(key)
    }
}

impl<T: Clone> CacheStore<T> {
    // == Get ==
    /// Returns a clone of the value if present and not expired.
    ///
    /// A hit bumps the entry's hit counter; an expired entry is removed.
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.live_entry(key) {
            Some(entry) => {
                entry.record_hit();
                debug!("Cache hit for key: {}", key);
                Some(entry.value.clone())
            }
            None => {
                debug!("Cache miss for key: {}", key);
                None
            }
        }
    }
}
