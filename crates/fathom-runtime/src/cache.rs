//! Bounded, thread-safe LRU cache with optional time-to-live.
//!
//! The retrieval paths key this by query fingerprint and store chunk-id
//! lists only; hit paths re-materialize full rows from the owning store.
//! Eviction must be deterministic (strict least-recently-used), so this
//! is a hand-rolled structure rather than a probabilistic cache.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use fathom_core::config::CacheConfig;

struct Entry<V> {
    value: V,
    /// Recency stamp; larger = more recently used.
    stamp: u64,
    touched_at: Instant,
}

struct CacheState<V> {
    entries: HashMap<String, Entry<V>>,
    /// stamp → key, ordered oldest-first for eviction.
    recency: BTreeMap<u64, String>,
    next_stamp: u64,
}

/// String-keyed LRU mapping. All operations are mutually exclusive;
/// a `get` moves the entry to the most-recent position.
pub struct LruCache<V> {
    state: Mutex<CacheState<V>>,
    capacity: usize,
    ttl: Option<Duration>,
}

impl<V: Clone> LruCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = (config.ttl_seconds > 0).then(|| Duration::from_secs(config.ttl_seconds));
        Self::with_capacity_and_ttl(config.capacity, ttl)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_ttl(capacity, None)
    }

    pub fn with_capacity_and_ttl(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                next_stamp: 0,
            }),
            capacity,
            ttl,
        }
    }

    /// Look up a key, refreshing its recency. An entry older than the TTL
    /// is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();

        if let Some(ttl) = self.ttl {
            if let Some(entry) = state.entries.get(key) {
                if entry.touched_at.elapsed() > ttl {
                    let stamp = entry.stamp;
                    state.entries.remove(key);
                    state.recency.remove(&stamp);
                    debug!(key, "cache entry expired");
                    return None;
                }
            }
        }

        let stamp = state.bump_stamp();
        let entry = state.entries.get_mut(key)?;
        let old_stamp = entry.stamp;
        entry.stamp = stamp;
        let value = entry.value.clone();
        state.recency.remove(&old_stamp);
        state.recency.insert(stamp, key.to_string());
        Some(value)
    }

    /// Insert or overwrite, evicting the least-recently-used entry when
    /// at capacity.
    pub fn put(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        let mut state = self.state.lock();
        let stamp = state.bump_stamp();

        if let Some(existing) = state.entries.get_mut(&key) {
            let old_stamp = existing.stamp;
            existing.value = value;
            existing.stamp = stamp;
            existing.touched_at = Instant::now();
            state.recency.remove(&old_stamp);
            state.recency.insert(stamp, key);
            return;
        }

        if state.entries.len() >= self.capacity {
            let oldest = state.recency.keys().next().copied();
            if let Some(oldest) = oldest {
                if let Some(victim) = state.recency.remove(&oldest) {
                    state.entries.remove(&victim);
                    debug!(key = %victim, "evicted least-recently-used entry");
                }
            }
        }

        state.recency.insert(stamp, key.clone());
        state.entries.insert(
            key,
            Entry {
                value,
                stamp,
                touched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> CacheState<V> {
    fn bump_stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }
}
