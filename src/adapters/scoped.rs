//! Scoped list / by-identifier adapter.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::keys::{CallerScope, KeyScheme};

/// What a key in the scoped store holds. The key prefix decides the
/// variant, so a list key never maps to an item and vice versa.
#[derive(Debug, Clone)]
enum ScopedValue<L, D> {
    List(L),
    Item(D),
}

// == Scoped Cache ==
/// Read-through cache for a collection that callers see through their own
/// authorization scope.
///
/// List views are keyed by caller scope (see [`KeyScheme::list_key`]);
/// detail views are keyed by resource id only. `L` is the list view type
/// and `D` the single-resource type.
#[derive(Debug)]
pub struct ScopedCache<L, D> {
    keys: KeyScheme,
    store: CacheStore<ScopedValue<L, D>>,
    list_ttl: Duration,
    item_ttl: Duration,
}

impl<L: Clone, D: Clone> ScopedCache<L, D> {
    // == Constructor ==
    /// Creates an adapter with its own store of `max_entries` entries.
    pub fn new(keys: KeyScheme, max_entries: usize, list_ttl: Duration, item_ttl: Duration) -> Self {
        let store = CacheStore::new(max_entries).with_name(keys.namespace());
        Self {
            keys,
            store,
            list_ttl,
            item_ttl,
        }
    }

    /// Creates an adapter for `namespace` using the configured capacity,
    /// privileged role and default TTLs.
    pub fn from_config(namespace: &str, config: &Config) -> Self {
        Self::new(
            KeyScheme::new(namespace, config.privileged_role.as_str()),
            config.max_entries,
            config.list_ttl,
            config.item_ttl,
        )
    }

    pub fn keys(&self) -> &KeyScheme {
        &self.keys
    }

    pub fn list_ttl(&self) -> Duration {
        self.list_ttl
    }

    pub fn item_ttl(&self) -> Duration {
        self.item_ttl
    }

    // == Get List ==
    /// Returns the caller's list view, loading it on a miss.
    pub async fn get_list<F, Fut, E>(&self, scope: &CallerScope, loader: F) -> Result<L, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<L, E>>,
    {
        self.get_list_with_ttl(scope, self.list_ttl, loader).await
    }

    /// Same as [`get_list`](Self::get_list) with an explicit TTL.
    ///
    /// When the scope yields no key the loader runs directly and the store
    /// is neither read nor written.
    pub async fn get_list_with_ttl<F, Fut, E>(
        &self,
        scope: &CallerScope,
        ttl: Duration,
        loader: F,
    ) -> Result<L, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<L, E>>,
    {
        let Some(key) = self.keys.list_key(scope) else {
            trace!(cache = %self.keys.namespace(), "ambiguous scope, bypassing cache");
            return loader().await;
        };

        let value = self
            .store
            .get_or_set(&key, Some(ttl), || async move {
                loader().await.map(ScopedValue::List)
            })
            .await?;

        match value {
            ScopedValue::List(list) => Ok(list),
            ScopedValue::Item(_) => unreachable!("list key {key} holds a detail view"),
        }
    }

    // == Get By Id ==
    /// Returns the detail view of one resource, loading it on a miss.
    pub async fn get_by_id<F, Fut, E>(&self, id: i64, loader: F) -> Result<D, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D, E>>,
    {
        self.get_by_id_with_ttl(id, self.item_ttl, loader).await
    }

    /// Same as [`get_by_id`](Self::get_by_id) with an explicit TTL.
    pub async fn get_by_id_with_ttl<F, Fut, E>(
        &self,
        id: i64,
        ttl: Duration,
        loader: F,
    ) -> Result<D, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D, E>>,
    {
        let key = self.keys.id_key(id);

        let value = self
            .store
            .get_or_set(&key, Some(ttl), || async move {
                loader().await.map(ScopedValue::Item)
            })
            .await?;

        match value {
            ScopedValue::Item(item) => Ok(item),
            ScopedValue::List(_) => unreachable!("id key {key} holds a list view"),
        }
    }

    // == Invalidate ==
    /// Drops cached views after the underlying data changed.
    ///
    /// Every list view goes, whichever scope cached it. With a known id only
    /// that resource's detail view is dropped; without one (e.g. after a
    /// create) all detail views are.
    pub fn invalidate(&self, identifier_hint: Option<i64>) {
        let lists = self.store.delete_by_prefix(&self.keys.list_prefix());

        let items = match identifier_hint {
            Some(id) => usize::from(self.store.delete(&self.keys.id_key(id))),
            None => self.store.delete_by_prefix(&self.keys.id_prefix()),
        };

        debug!(
            cache = %self.keys.namespace(),
            ?identifier_hint,
            lists,
            items,
            "invalidated cached views"
        );
    }

    /// Empties the store. Meant for test setup.
    pub fn reset(&self) {
        self.store.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> ScopedCache<Vec<u32>, String> {
        ScopedCache::new(
            KeyScheme::new("items", "admin"),
            100,
            Duration::from_secs(30),
            Duration::from_secs(120),
        )
    }

    #[test]
    fn test_from_config_uses_configured_defaults() {
        let config = Config {
            list_ttl: Duration::from_millis(100),
            item_ttl: Duration::from_millis(900),
            privileged_role: "owner".to_string(),
            ..Config::default()
        };

        let cache: ScopedCache<Vec<u32>, String> = ScopedCache::from_config("items", &config);

        assert_eq!(cache.list_ttl(), Duration::from_millis(100));
        assert_eq!(cache.item_ttl(), Duration::from_millis(900));
        assert!(cache.keys().is_privileged(&CallerScope::new("OWNER", None)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_list_and_item_share_one_store() {
        let cache = cache();

        let list = cache
            .get_list(&CallerScope::new("member", Some(1)), || async {
                Ok::<_, String>(vec![1, 2, 3])
            })
            .await;
        let item = cache
            .get_by_id(1, || async { Ok::<_, String>("one".to_string()) })
            .await;

        assert_eq!(list, Ok(vec![1, 2, 3]));
        assert_eq!(item, Ok("one".to_string()));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_ambiguous_scope_never_touches_store() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let scope = CallerScope::new("member", None);

        for _ in 0..2 {
            let result = cache
                .get_list(&scope, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, String>(vec![7]) }
                })
                .await;
            assert_eq!(result, Ok(vec![7]));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits + cache.stats().misses, 0);
    }

    #[tokio::test]
    async fn test_failed_list_load_is_not_cached() {
        let cache = cache();
        let scope = CallerScope::new("admin", Some(1));

        let result = cache
            .get_list(&scope, || async { Err("timeout".to_string()) })
            .await;

        assert_eq!(result, Err("timeout".to_string()));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_without_hint_clears_everything() {
        let cache = cache();
        let scope = CallerScope::new("member", Some(3));

        cache
            .get_list(&scope, || async { Ok::<_, String>(vec![1]) })
            .await
            .unwrap();
        for id in 1..=3 {
            cache
                .get_by_id(id, || async move { Ok::<_, String>(id.to_string()) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 4);

        cache.invalidate(None);

        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_with_unknown_id_is_harmless() {
        let cache = cache();

        cache
            .get_by_id(1, || async { Ok::<_, String>("one".to_string()) })
            .await
            .unwrap();

        cache.invalidate(Some(42));

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_empties_store() {
        let cache = cache();

        cache
            .get_by_id(1, || async { Ok::<_, String>("one".to_string()) })
            .await
            .unwrap();
        cache.reset();

        assert!(cache.is_empty());
    }
}
