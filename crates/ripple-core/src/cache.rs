// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Timestep-keyed memo table shared by the snapshot and partition caches.
//!
//! The default policy keeps every visited timestep for the life of the
//! process. `Lru` bounds memory at the cost of recomputing evicted entries;
//! callers observe identical values either way.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use ripple_graph::Timestep;
use rustc_hash::FxHashMap;

/// Retention policy for cached per-timestep results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never evict.
    #[default]
    Unbounded,
    /// Keep at most this many timesteps, evicting the least recently used.
    Lru(NonZeroUsize),
}

impl CachePolicy {
    /// `None` or `Some(0)` mean unbounded.
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        capacity
            .and_then(NonZeroUsize::new)
            .map_or(Self::Unbounded, Self::Lru)
    }
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the table.
    pub hits: u64,
    /// Lookups that had to compute a value.
    pub misses: u64,
}

enum Entries<V> {
    Unbounded(FxHashMap<Timestep, Arc<V>>),
    Lru(LruCache<Timestep, Arc<V>>),
}

/// Memo table from timestep to a shared, immutable value.
pub struct TimestepCache<V> {
    entries: Entries<V>,
    stats: CacheStats,
}

impl<V> TimestepCache<V> {
    /// Create an empty cache with the given policy.
    pub fn new(policy: CachePolicy) -> Self {
        let entries = match policy {
            CachePolicy::Unbounded => Entries::Unbounded(FxHashMap::default()),
            CachePolicy::Lru(cap) => Entries::Lru(LruCache::new(cap)),
        };
        Self {
            entries,
            stats: CacheStats::default(),
        }
    }

    /// Cached value for `t`, if any. Does not touch the counters.
    pub fn peek(&self, t: Timestep) -> Option<Arc<V>> {
        match &self.entries {
            Entries::Unbounded(map) => map.get(&t).cloned(),
            Entries::Lru(lru) => lru.peek(&t).cloned(),
        }
    }

    /// Whether `t` currently has an entry.
    pub fn contains(&self, t: Timestep) -> bool {
        match &self.entries {
            Entries::Unbounded(map) => map.contains_key(&t),
            Entries::Lru(lru) => lru.contains(&t),
        }
    }

    /// Number of cached timesteps.
    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Unbounded(map) => map.len(),
            Entries::Lru(lru) => lru.len(),
        }
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        match &self.entries {
            Entries::Unbounded(map) => map.is_empty(),
            Entries::Lru(lru) => lru.is_empty(),
        }
    }

    /// Hit/miss counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Return the entry for `t`, computing and storing it on a miss.
    ///
    /// Errors from `compute` are returned as-is and nothing is stored.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        t: Timestep,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let hit = match &mut self.entries {
            Entries::Unbounded(map) => map.get(&t).cloned(),
            Entries::Lru(lru) => lru.get(&t).cloned(),
        };
        if let Some(v) = hit {
            self.stats.hits += 1;
            return Ok(v);
        }
        self.stats.misses += 1;
        let value = Arc::new(compute()?);
        match &mut self.entries {
            Entries::Unbounded(map) => {
                map.insert(t, Arc::clone(&value));
            }
            Entries::Lru(lru) => {
                lru.put(t, Arc::clone(&value));
            }
        }
        Ok(value)
    }

    /// Infallible variant of [`Self::get_or_try_insert_with`].
    pub fn get_or_insert_with(&mut self, t: Timestep, compute: impl FnOnce() -> V) -> Arc<V> {
        match self.get_or_try_insert_with(t, || Ok::<V, std::convert::Infallible>(compute())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_cache_counts_hits_and_misses() {
        let mut cache = TimestepCache::new(CachePolicy::Unbounded);
        let a = cache.get_or_insert_with(3, || "three".to_owned());
        let b = cache.get_or_insert_with(3, || unreachable!("must hit"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_computations_are_not_stored() {
        let mut cache: TimestepCache<u32> = TimestepCache::new(CachePolicy::Unbounded);
        let err = cache.get_or_try_insert_with(1, || Err("boom"));
        assert_eq!(err, Err("boom"));
        assert!(!cache.contains(1));
        let ok = cache.get_or_try_insert_with(1, || Ok::<_, &str>(7));
        assert_eq!(ok.map(|v| *v), Ok(7));
    }

    #[test]
    fn lru_cache_evicts_least_recent() {
        let mut cache = TimestepCache::new(CachePolicy::from_capacity(Some(2)));
        cache.get_or_insert_with(1, || 1);
        cache.get_or_insert_with(2, || 2);
        cache.get_or_insert_with(1, || 1);
        cache.get_or_insert_with(3, || 3);
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_means_unbounded() {
        assert_eq!(CachePolicy::from_capacity(Some(0)), CachePolicy::Unbounded);
        assert_eq!(CachePolicy::from_capacity(None), CachePolicy::Unbounded);
    }
}
