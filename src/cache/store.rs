//! Cache Store Module
//!
//! Bounded key/value store with per-entry TTL, lazy expiry and
//! oldest-first eviction. Knows nothing about the values it holds.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Cache Store ==
/// Bounded TTL store, generic over its value type.
///
/// Every operation takes `&self`; the internal lock is only ever held for
/// the duration of a single synchronous operation, never across a loader.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Label used in log output
    name: String,
    /// Maximum number of entries allowed
    max_entries: usize,
    state: Mutex<StoreState<V>>,
}

#[derive(Debug)]
struct StoreState<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Creation order, oldest first
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> StoreState<V> {
    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            name: "cache".to_string(),
            max_entries,
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                order: InsertionOrder::new(),
                stats: CacheStats::new(),
            }),
        }
    }

    /// Sets the label used in log output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// An entry found past its expiry is removed on the spot and reported
    /// as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        match state.entries.get(key) {
            None => {
                state.stats.record_miss();
                None
            }
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                state.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                state.remove(key);
                state.stats.record_expiration();
                debug!(cache = %self.name, key, "dropped expired entry on read");
                None
            }
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing entry under the same key.
    ///
    /// `ttl` of None means the entry never expires by time. If the insert
    /// pushes the store over its capacity, the oldest-created entry is
    /// evicted before returning.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let mut state = self.state.lock();

        state.order.record_insert(&key);
        state.entries.insert(key, CacheEntry::new(value, ttl));

        if state.entries.len() > self.max_entries {
            if let Some(evicted) = state.order.pop_oldest() {
                state.entries.remove(&evicted);
                state.stats.record_eviction();
                debug!(cache = %self.name, key = %evicted, "evicted oldest entry");
            }
        }

        let len = state.entries.len();
        state.stats.set_total_entries(len);
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.state.lock().remove(key)
    }

    // == Delete By Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_by_prefix(&self, prefix: &str) -> usize {
        let mut state = self.state.lock();

        let before = state.entries.len();
        state.entries.retain(|key, _| !key.starts_with(prefix));
        state.order.remove_prefix(prefix);

        let len = state.entries.len();
        state.stats.set_total_entries(len);
        before - len
    }

    // == Clear ==
    /// Empties the store. Statistics are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
        state.stats.set_total_entries(0);
    }

    // == Get Or Set ==
    /// Read-through lookup.
    ///
    /// Returns the cached value when present without calling `loader`.
    /// Otherwise awaits `loader` and caches its result on success. A loader
    /// error is returned unchanged and leaves the store untouched.
    ///
    /// Concurrent misses on the same key each run their own loader; the
    /// last one to finish overwrites the others.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        loader: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = loader().await?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    // == Contains Key ==
    /// Reports whether an entry is stored under `key`, stale or not.
    ///
    /// Unlike [`get`](Self::get) this neither expires the entry nor
    /// touches the statistics.
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unread included.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
