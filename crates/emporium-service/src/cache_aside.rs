//! Cache-aside read and invalidation primitives.
//!
//! A read looks in the cache first and falls back to the store on a miss,
//! then fills the cache from a detached task. A mutation drops the affected
//! keys from a detached task once the store has committed. Cache failures
//! on either path are logged and counted, never returned.

use crate::cache::{CacheInterface, Keyspace};
use crate::metrics::CacheMetrics;
use emporium_core::EmporiumResult;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache-aside reader for one keyspace, keyed by `K` and caching `V`.
pub struct CacheAsideReader<K, V> {
    cache: Arc<dyn CacheInterface>,
    keyspace: Keyspace,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V> CacheAsideReader<K, V>
where
    K: Display + Sync,
    V: Serialize + DeserializeOwned + Send + 'static,
{
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, keyspace: Keyspace) -> Self {
        Self {
            cache,
            keyspace,
            _marker: PhantomData,
        }
    }

    /// Returns the cached value for `key`, or the result of `load`.
    ///
    /// A hit is returned as is. On a miss `load` runs; its error is returned
    /// without touching the cache and its value is returned while the cache
    /// fills in the background.
    pub async fn fetch<F, Fut>(&self, key: &K, load: F) -> EmporiumResult<V>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = EmporiumResult<V>> + Send,
    {
        if !self.cache.is_enabled() {
            return load().await;
        }

        let cache_key = self.keyspace.key(key);
        if let Some(hit) = self.lookup(&cache_key).await {
            return Ok(hit);
        }

        let value = load().await?;
        self.populate(cache_key, &value);
        Ok(value)
    }

    async fn lookup(&self, cache_key: &str) -> Option<V> {
        let keyspace = self.keyspace.name;
        match self.cache.get_raw(cache_key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    debug!("Cache hit for key '{}'", cache_key);
                    CacheMetrics::hit(keyspace);
                    Some(value)
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry '{}': {}", cache_key, e);
                    CacheMetrics::read_error(keyspace);
                    CacheMetrics::miss(keyspace);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache miss for key '{}'", cache_key);
                CacheMetrics::miss(keyspace);
                None
            }
            Err(e) => {
                warn!("Cache read failed for key '{}': {}", cache_key, e);
                CacheMetrics::read_error(keyspace);
                CacheMetrics::miss(keyspace);
                None
            }
        }
    }

    fn populate(&self, cache_key: String, value: &V) {
        let keyspace = self.keyspace.name;
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Cannot encode value for cache key '{}': {}", cache_key, e);
                CacheMetrics::populate_failed(keyspace);
                return;
            }
        };

        let cache = Arc::clone(&self.cache);
        let ttl = self.keyspace.ttl;
        tokio::spawn(async move {
            if let Err(e) = cache.set_raw(&cache_key, &json, ttl).await {
                warn!("Cache population failed for key '{}': {}", cache_key, e);
                CacheMetrics::populate_failed(keyspace);
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Key { keyspace: &'static str, key: String },
    Pattern { keyspace: &'static str, pattern: String },
}

/// Set of cache entries made stale by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    targets: Vec<Target>,
}

impl Invalidation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry. Adding the same entry twice has no effect.
    #[must_use]
    pub fn key(mut self, keyspace: &Keyspace, key: impl Display) -> Self {
        let target = Target::Key {
            keyspace: keyspace.name,
            key: keyspace.key(key),
        };
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    /// Adds every entry of a keyspace.
    #[must_use]
    pub fn pattern(mut self, keyspace: &Keyspace) -> Self {
        let target = Target::Pattern {
            keyspace: keyspace.name,
            pattern: keyspace.pattern(),
        };
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    /// Cache keys and patterns in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<&str> {
        self.targets
            .iter()
            .map(|target| match target {
                Target::Key { key, .. } => key.as_str(),
                Target::Pattern { pattern, .. } => pattern.as_str(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Drops stale cache entries after a committed mutation.
#[derive(Clone)]
pub struct CacheAsideInvalidator {
    cache: Arc<dyn CacheInterface>,
}

impl CacheAsideInvalidator {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }

    /// Deletes the entries from a detached task and returns immediately.
    pub fn invalidate(&self, invalidation: Invalidation) {
        if invalidation.is_empty() || !self.cache.is_enabled() {
            return;
        }

        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            for target in invalidation.targets {
                match target {
                    Target::Key { keyspace, key } => match cache.delete(&key).await {
                        Ok(removed) => {
                            debug!("Invalidated '{}' (present: {})", key, removed);
                            CacheMetrics::invalidated(keyspace);
                        }
                        Err(e) => {
                            warn!("Cache invalidation failed for key '{}': {}", key, e);
                            CacheMetrics::invalidation_failed(keyspace);
                        }
                    },
                    Target::Pattern { keyspace, pattern } => {
                        match cache.delete_pattern(&pattern).await {
                            Ok(removed) => {
                                debug!("Invalidated {} keys matching '{}'", removed, pattern);
                                CacheMetrics::invalidated(keyspace);
                            }
                            Err(e) => {
                                warn!("Cache invalidation failed for '{}': {}", pattern, e);
                                CacheMetrics::invalidation_failed(keyspace);
                            }
                        }
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for CacheAsideInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAsideInvalidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keyspace::{CART_ITEM, PRODUCT_SEARCH, USER_CART_ITEMS};
    use crate::cache::{InMemoryCache, RedisCacheService, UnavailableCache};
    use crate::testing::eventually;
    use emporium_core::{CartItemId, EmporiumError, UserId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reader(cache: Arc<dyn CacheInterface>) -> CacheAsideReader<CartItemId, String> {
        CacheAsideReader::new(cache, CART_ITEM)
    }

    #[tokio::test]
    async fn test_miss_loads_and_populates() {
        let cache = Arc::new(InMemoryCache::new());
        let reader = reader(cache.clone());
        let id = CartItemId::new(1);

        let value = reader
            .fetch(&id, || async { Ok("from store".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "from store");

        let key = CART_ITEM.key(id);
        assert!(eventually(|| cache.contains(&key)).await);
    }

    #[tokio::test]
    async fn test_hit_skips_store() {
        let cache = Arc::new(InMemoryCache::new());
        cache
            .set_raw(&CART_ITEM.key(2), "\"cached\"", CART_ITEM.ttl)
            .await
            .unwrap();
        let loads = AtomicUsize::new(0);

        let value = reader(cache)
            .fetch(&CartItemId::new(2), || async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok("from store".to_string())
            })
            .await
            .unwrap();

        assert_eq!(value, "cached");
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_error_leaves_cache_untouched() {
        let cache = Arc::new(InMemoryCache::new());
        let err = reader(cache.clone())
            .fetch(&CartItemId::new(3), || async {
                Err(EmporiumError::not_found("CartItem", 3))
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        tokio::task::yield_now().await;
        assert_eq!(cache.set_count(), 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let cache = Arc::new(InMemoryCache::new());
        cache
            .set_raw(&CART_ITEM.key(4), "not json", CART_ITEM.ttl)
            .await
            .unwrap();

        let value = reader(cache)
            .fetch(&CartItemId::new(4), || async { Ok("fresh".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "fresh");
    }

    #[tokio::test]
    async fn test_unavailable_cache_falls_back_to_store() {
        let cache = Arc::new(UnavailableCache::new());
        let value = reader(cache.clone())
            .fetch(&CartItemId::new(5), || async { Ok("from store".to_string()) })
            .await
            .unwrap();

        assert_eq!(value, "from store");
        // read, then the background write
        assert!(eventually(|| cache.call_count() == 2).await);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_loads() {
        let loads = AtomicUsize::new(0);
        let reader = reader(Arc::new(RedisCacheService::disabled()));
        for _ in 0..2 {
            reader
                .fetch(&CartItemId::new(6), || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok("from store".to_string())
                })
                .await
                .unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidation_deduplicates() {
        let alice = UserId::new("alice");
        let invalidation = Invalidation::new()
            .key(&CART_ITEM, CartItemId::new(1))
            .key(&USER_CART_ITEMS, &alice)
            .key(&USER_CART_ITEMS, &alice)
            .pattern(&PRODUCT_SEARCH);

        assert_eq!(
            invalidation.entries(),
            vec![
                "emporium:cart-item-cache/1",
                "emporium:user-cart-items-cache/alice",
                "emporium:product-search-cache/*",
            ]
        );
    }

    #[tokio::test]
    async fn test_invalidator_deletes_keys_and_patterns() {
        let cache = Arc::new(InMemoryCache::new());
        for key in [
            CART_ITEM.key(1),
            PRODUCT_SEARCH.key("shirt"),
            PRODUCT_SEARCH.key("dress"),
        ] {
            cache.set_raw(&key, "[]", CART_ITEM.ttl).await.unwrap();
        }

        CacheAsideInvalidator::new(cache.clone()).invalidate(
            Invalidation::new()
                .key(&CART_ITEM, 1)
                .pattern(&PRODUCT_SEARCH),
        );

        assert!(eventually(|| cache.is_empty()).await);
    }

    #[tokio::test]
    async fn test_invalidator_swallows_failures() {
        let cache = Arc::new(UnavailableCache::new());
        CacheAsideInvalidator::new(cache.clone()).invalidate(
            Invalidation::new()
                .key(&CART_ITEM, 1)
                .key(&USER_CART_ITEMS, "alice"),
        );
        assert!(eventually(|| cache.call_count() == 2).await);
    }
}
