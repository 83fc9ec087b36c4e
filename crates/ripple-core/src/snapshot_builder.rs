// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Materializes and memoizes per-timestep snapshots from an [`EdgeStore`].

use std::sync::Arc;

use ripple_graph::{EdgeStore, Snapshot, TimeDomain, TimeSemantics, Timestep};
use tracing::debug;

use crate::cache::{CachePolicy, CacheStats, TimestepCache};

/// Owns the edge store and the snapshot cache.
///
/// Out-of-range requests are clamped into the domain rather than rejected, so
/// every timestep maps to exactly one cache key.
pub struct SnapshotBuilder<S> {
    store: S,
    semantics: TimeSemantics,
    domain: TimeDomain,
    cache: TimestepCache<Snapshot>,
}

impl<S: EdgeStore> SnapshotBuilder<S> {
    /// Build over `store`; `domain` bounds the timesteps that can be requested.
    pub fn new(store: S, semantics: TimeSemantics, domain: TimeDomain, policy: CachePolicy) -> Self {
        Self {
            store,
            semantics,
            domain,
            cache: TimestepCache::new(policy),
        }
    }

    /// Snapshot at `t` (clamped). Scans the store only on a cache miss.
    pub fn get_snapshot(&mut self, t: Timestep) -> Arc<Snapshot> {
        let t = self.domain.clamp(t);
        let store = &self.store;
        let semantics = self.semantics;
        self.cache.get_or_insert_with(t, || {
            let snap = Snapshot::from_store(store, t, semantics);
            debug!(
                timestep = t,
                nodes = snap.node_count(),
                edges = snap.edge_count(),
                "materialized snapshot"
            );
            snap
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active-edge rule in use.
    pub fn semantics(&self) -> TimeSemantics {
        self.semantics
    }

    /// Valid timestep range.
    pub fn domain(&self) -> TimeDomain {
        self.domain
    }

    /// Snapshot cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of cached snapshots.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
