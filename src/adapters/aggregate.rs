//! Single-key aggregate adapter.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;

// == Aggregate Cache ==
/// Memoizes one expensive, caller-independent view (a dashboard summary,
/// say) under a single fixed key with a short TTL.
///
/// There is no scoping: whoever may call the loader is entitled to the
/// same result, so upstream authorization must already guarantee that.
#[derive(Debug)]
pub struct AggregateCache<T> {
    key: String,
    store: CacheStore<T>,
    ttl: Duration,
}

impl<T: Clone> AggregateCache<T> {
    pub fn new(namespace: &str, ttl: Duration) -> Self {
        Self {
            key: format!("{}:aggregate", namespace),
            store: CacheStore::new(1).with_name(namespace),
            ttl,
        }
    }

    pub fn from_config(namespace: &str, config: &Config) -> Self {
        Self::new(namespace, config.aggregate_ttl)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the memoized aggregate, loading it on a miss.
    pub async fn get<F, Fut, E>(&self, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.get_with_ttl(self.ttl, loader).await
    }

    pub async fn get_with_ttl<F, Fut, E>(&self, ttl: Duration, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.store.get_or_set(&self.key, Some(ttl), loader).await
    }

    /// Drops the memoized value so the next call recomputes it.
    pub fn invalidate(&self) {
        if self.store.delete(&self.key) {
            debug!(key = %self.key, "invalidated aggregate");
        }
    }

    /// Empties the store. Meant for test setup.
    pub fn reset(&self) {
        self.store.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn is_cached(&self) -> bool {
        self.store.contains_key(&self.key)
    }
}
