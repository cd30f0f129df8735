//! Cache Store Module
//!
//! Main cache engine combining HashMap lookup with a linked recency list
//! for least-recently-used eviction.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use crate::cache::order::RecencyList;
use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

// == Entry ==
/// A stored key-value pair, held in the slot its recency list node owns.
#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

// == LRU Cache ==
/// Fixed-capacity key-value cache with least-recently-used eviction.
///
/// Both `insert` and a successful `get` count as a use and make the key
/// the most recently used entry. Inserting a new key into a full cache
/// evicts the least recently used entry first, so the entry count never
/// exceeds the configured capacity.
///
/// Lookup, reorder-on-access, and eviction are all O(1) average-case: a
/// `HashMap` maps each key to a slot in a doubly-linked recency list, and
/// values live in a slot-indexed table alongside it.
///
/// Keys are compared by value (`Eq + Hash`), not identity; equal keys
/// share one entry regardless of where they were created.
///
/// A miss from [`get`] is `None`, which no stored value can collide with.
/// [`contains`] and [`peek`] answer "is it there" and "what is it" without
/// counting as a use.
///
/// The cache itself is synchronous and single-threaded; for shared access
/// across tasks, see [`SharedCache`](crate::memo::SharedCache).
///
/// [`get`]: LruCache::get
/// [`contains`]: LruCache::contains
/// [`peek`]: LruCache::peek
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Key to recency-slot index
    map: HashMap<K, usize>,
    /// Slot-indexed entry storage, grown in lockstep with the recency list
    entries: Vec<Option<Entry<K, V>>>,
    /// Recency order over slots
    order: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is rejected with [`CacheError::ZeroCapacity`]
    /// rather than producing a cache that could never hold an entry.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self {
            map: HashMap::new(),
            entries: Vec::new(),
            order: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Insert ==
    /// Stores a key-value pair, returning the previous value for the key
    /// if one was present.
    ///
    /// The key becomes the most recently used entry in either case. If the
    /// key is new and the cache is full, the least recently used entry is
    /// evicted before the insert, so the entry count never exceeds
    /// capacity.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        // Overwrite case: same slot, new value, refreshed recency
        if let Some(slot) = self.map.get(&key).copied() {
            self.order.touch(slot);
            let previous = self.entries[slot].replace(Entry { key, value });
            return previous.map(|entry| entry.value);
        }

        // New key: make room first so capacity is never exceeded
        if self.map.len() >= self.capacity {
            self.evict_oldest();
        }

        let slot = self.order.push_newest();
        let entry = Entry {
            key: key.clone(),
            value,
        };
        if slot == self.entries.len() {
            self.entries.push(Some(entry));
        } else {
            self.entries[slot] = Some(entry);
        }
        self.map.insert(key, slot);
        self.stats.set_total_entries(self.map.len());
        None
    }

    // == Get ==
    /// Retrieves a value by key, marking the key as most recently used.
    ///
    /// A miss returns None and leaves both recency order and size
    /// untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key).copied() {
            Some(slot) => {
                self.order.touch(slot);
                self.stats.record_hit();
                self.entries[slot].as_ref().map(|entry| &entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Retrieves a value by key without affecting recency order or stats.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let slot = *self.map.get(key)?;
        self.entries[slot].as_ref().map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks whether a key is present.
    ///
    /// Pure query: does not count as a use and records no hit or miss.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.map.remove(key)?;
        self.order.remove(slot);
        let entry = self.entries[slot].take();
        self.stats.set_total_entries(self.map.len());
        entry.map(|entry| entry.value)
    }

    // == Clear ==
    /// Removes every entry. Hit/miss/eviction counters are preserved.
    pub fn clear(&mut self) {
        self.map.clear();
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries the cache may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.map.len());
        stats
    }

    // == Reset Stats ==
    /// Zeroes the hit/miss/eviction counters without touching entries.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Drops the least recently used entry to make room for a new one.
    fn evict_oldest(&mut self) {
        if let Some(slot) = self.order.pop_oldest() {
            if let Some(entry) = self.entries[slot].take() {
                self.map.remove(&entry.key);
                self.stats.record_eviction();
                trace!("evicted least recently used entry");
            }
        }
    }
}
