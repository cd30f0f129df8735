//! Shared Cache Module
//!
//! Async, clone-able cache handle with in-flight request deduplication.
//!
//! Wraps the synchronous [`LruCache`] in `Arc<RwLock<..>>` so many tasks
//! can share one cache domain, and keeps one cell per key currently being
//! fetched so concurrent misses for the same key trigger a single fetch.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::debug;

use crate::cache::{CacheStats, LruCache};
use crate::config::Config;
use crate::error::Result;

// == Shared Cache ==
/// Task-safe handle to a bounded LRU cache.
///
/// Cloning the handle is shallow: every clone reads and writes the same
/// underlying cache. Lock ordering is pending-then-cache throughout, so
/// the two locks can never deadlock against each other.
pub struct SharedCache<K, V> {
    /// The cache store behind a reader-writer lock
    cache: Arc<RwLock<LruCache<K, V>>>,
    /// One cell per key with a fetch currently in flight
    pending: Arc<Mutex<HashMap<K, Arc<OnceCell<V>>>>>,
}

// Manual impl: a handle is clonable regardless of whether K and V are
impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        let cache = LruCache::new(capacity)?;
        Ok(Self {
            cache: Arc::new(RwLock::new(cache)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Creates a shared cache sized from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.cache_capacity)
    }

    // == Get ==
    /// Returns a clone of the cached value, refreshing its recency.
    ///
    /// Takes the write lock: a hit moves the key to most recently used.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.cache.write().await.get(key).cloned()
    }

    // == Insert ==
    /// Stores a key-value pair, returning the previous value if present.
    pub async fn insert(&self, key: K, value: V) -> Option<V> {
        self.cache.write().await.insert(key, value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub async fn remove(&self, key: &K) -> Option<V> {
        self.cache.write().await.remove(key)
    }

    // == Contains ==
    /// Checks for a key without touching recency order.
    pub async fn contains(&self, key: &K) -> bool {
        self.cache.read().await.contains(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries the cache may hold.
    pub async fn capacity(&self) -> usize {
        self.cache.read().await.capacity()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, or runs `fetch` to produce it.
    ///
    /// Concurrent callers for the same missing key share a single fetch:
    /// one runs `fetch`, the rest await its outcome. A successful value is
    /// inserted into the cache and returned to every caller. A failed
    /// fetch is not cached; the error propagates to this caller and the
    /// next call for the key fetches again.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        // Fast path: value already cached
        if let Some(value) = self.cache.write().await.get(&key) {
            return Ok(value.clone());
        }

        // Join the in-flight fetch for this key, or start one
        let cell = {
            let mut pending = self.pending.lock().await;
            // Re-check under the lock: a concurrent fetch may have landed
            // between the fast-path miss and here
            if let Some(value) = self.cache.write().await.get(&key) {
                return Ok(value.clone());
            }
            Arc::clone(
                pending
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };

        let outcome = cell
            .get_or_try_init(|| {
                debug!("cache miss, running fetch");
                fetch()
            })
            .await;

        match outcome {
            Ok(value) => {
                let value = value.clone();
                self.cache.write().await.insert(key.clone(), value.clone());
                self.clear_in_flight(&key, &cell).await;
                Ok(value)
            }
            Err(err) => {
                // Failures are not cached: clear the slot so the next
                // caller fetches again
                self.clear_in_flight(&key, &cell).await;
                Err(err)
            }
        }
    }

    /// Removes the in-flight cell for `key` if it is still the given one.
    async fn clear_in_flight(&self, key: &K, cell: &Arc<OnceCell<V>>) {
        let mut pending = self.pending.lock().await;
        let is_same_cell = pending
            .get(key)
            .map_or(false, |existing| Arc::ptr_eq(existing, cell));
        if is_same_cell {
            pending.remove(key);
        }
    }
}
