// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Community detection port and the per-timestep partition cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use ripple_graph::{NodeId, Snapshot, Timestep, UndirectedGraph};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::cache::{CachePolicy, CacheStats, TimestepCache};
use crate::error::DetectorError;

/// Splits an undirected graph into disjoint communities.
///
/// Implementations must be deterministic for a given `(graph, seed)`: the
/// returned group order becomes the community id of every member.
pub trait CommunityDetector {
    /// Partition every node of `graph` into ordered, disjoint groups.
    fn partition(
        &self,
        graph: &UndirectedGraph,
        seed: u64,
    ) -> Result<Vec<BTreeSet<NodeId>>, DetectorError>;
}

impl<F> CommunityDetector for F
where
    F: Fn(&UndirectedGraph, u64) -> Result<Vec<BTreeSet<NodeId>>, DetectorError>,
{
    fn partition(
        &self,
        graph: &UndirectedGraph,
        seed: u64,
    ) -> Result<Vec<BTreeSet<NodeId>>, DetectorError> {
        self(graph, seed)
    }
}

/// Ordered communities of one snapshot plus the reverse `node -> id` index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<BTreeSet<NodeId>>,
    index: FxHashMap<NodeId, usize>,
}

impl Partition {
    /// Validate `groups` against `nodes` and index them.
    ///
    /// Groups must be non-empty, pairwise disjoint, and cover exactly `nodes`.
    pub fn new(
        groups: Vec<BTreeSet<NodeId>>,
        nodes: &BTreeSet<NodeId>,
    ) -> Result<Self, DetectorError> {
        let mut index = FxHashMap::default();
        for (id, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(DetectorError::InvalidPartition(format!(
                    "community {id} is empty"
                )));
            }
            for node in group {
                if !nodes.contains(node) {
                    return Err(DetectorError::InvalidPartition(format!(
                        "node {node} is not in the snapshot"
                    )));
                }
                if let Some(prev) = index.insert(node.clone(), id) {
                    return Err(DetectorError::InvalidPartition(format!(
                        "node {node} is in communities {prev} and {id}"
                    )));
                }
            }
        }
        if let Some(missing) = nodes.iter().find(|n| !index.contains_key(*n)) {
            return Err(DetectorError::InvalidPartition(format!(
                "node {missing} is not assigned a community"
            )));
        }
        Ok(Self { groups, index })
    }

    /// Community groups in id order.
    pub fn groups(&self) -> &[BTreeSet<NodeId>] {
        &self.groups
    }

    /// Community id of `node`, if it belongs to this partition.
    pub fn community_of(&self, node: &NodeId) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Number of communities.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True for the partition of an empty snapshot.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Memoizes detector output per timestep under a fixed seed.
pub struct CommunityCache<D> {
    detector: D,
    seed: u64,
    cache: TimestepCache<Partition>,
}

impl<D: CommunityDetector> CommunityCache<D> {
    /// Wrap `detector`; every invocation receives `seed`.
    pub fn new(detector: D, seed: u64, policy: CachePolicy) -> Self {
        Self {
            detector,
            seed,
            cache: TimestepCache::new(policy),
        }
    }

    /// Partition for `snapshot`, stored under `t`.
    ///
    /// Empty snapshots never reach the detector. Failures are returned and not
    /// cached.
    pub fn get_partition(
        &mut self,
        t: Timestep,
        snapshot: &Snapshot,
    ) -> Result<Arc<Partition>, DetectorError> {
        let detector = &self.detector;
        let seed = self.seed;
        self.cache.get_or_try_insert_with(t, || {
            if snapshot.is_empty() {
                return Ok(Partition::default());
            }
            let groups = detector.partition(&snapshot.undirected(), seed)?;
            let partition = Partition::new(groups, &snapshot.nodes)?;
            debug!(
                timestep = t,
                communities = partition.len(),
                "detected communities"
            );
            Ok(partition)
        })
    }

    /// Seed passed to the detector.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Partition cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
