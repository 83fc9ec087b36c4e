// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame assembly over the snapshot and partition caches.

use ripple_graph::{EdgeStore, TimeDomain, TimeSemantics, Timestep, UndirectedGraph};
use tracing::{debug, info};

use crate::cache::{CachePolicy, CacheStats};
use crate::community::{CommunityCache, CommunityDetector};
use crate::error::EngineError;
use crate::frame::{Frame, FrameEdge, FrameNode};
use crate::layout::{centered_positions, BaseLayout, LayoutEngine};
use crate::palette::Palette;
use crate::sizer::DegreeSizer;
use crate::snapshot_builder::SnapshotBuilder;

/// Construction-time knobs for [`PlaybackEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Active-edge rule.
    pub semantics: TimeSemantics,
    /// Seed handed to the community detector.
    pub seed: u64,
    /// Number of palette colours in use (clamped to `1..=20`).
    pub palette_size: usize,
    /// Overrides the store-derived lower bound.
    pub min_timestep: Option<Timestep>,
    /// Overrides the store-derived upper bound.
    pub max_timestep: Option<Timestep>,
    /// Retention for both caches.
    pub cache: CachePolicy,
    /// Degree-to-size calibration.
    pub sizer: DegreeSizer,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            semantics: TimeSemantics::default(),
            seed: 42,
            palette_size: 20,
            min_timestep: None,
            max_timestep: None,
            cache: CachePolicy::default(),
            sizer: DegreeSizer::default(),
        }
    }
}

/// Owns every cache and collaborator needed to turn a timestep into a [`Frame`].
pub struct PlaybackEngine<S, D> {
    snapshots: SnapshotBuilder<S>,
    communities: CommunityCache<D>,
    sizer: DegreeSizer,
    palette: Palette,
    base_layout: BaseLayout,
}

impl<S: EdgeStore, D: CommunityDetector> PlaybackEngine<S, D> {
    /// Derive the domain from `store` and lay out every node it mentions once.
    ///
    /// An empty store yields the domain `[0, 0]` unless overridden.
    pub fn new<L: LayoutEngine + ?Sized>(
        store: S,
        detector: D,
        layout: &L,
        options: EngineOptions,
    ) -> Self {
        let domain = store
            .time_domain()
            .unwrap_or_default()
            .with_overrides(options.min_timestep, options.max_timestep);
        let base_layout = layout.layout(&UndirectedGraph::from_store(&store));
        info!(
            min = domain.min,
            max = domain.max,
            nodes = base_layout.len(),
            semantics = ?options.semantics,
            "engine ready"
        );
        Self {
            snapshots: SnapshotBuilder::new(store, options.semantics, domain, options.cache),
            communities: CommunityCache::new(detector, options.seed, options.cache),
            sizer: options.sizer,
            palette: Palette::category20(options.palette_size),
            base_layout,
        }
    }

    /// Valid timestep range.
    pub fn domain(&self) -> TimeDomain {
        self.snapshots.domain()
    }

    /// The reference layout frames are centred from.
    pub fn base_layout(&self) -> &BaseLayout {
        &self.base_layout
    }

    /// Palette in use.
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Snapshot cache counters.
    pub fn snapshot_stats(&self) -> CacheStats {
        self.snapshots.stats()
    }

    /// Partition cache counters.
    pub fn partition_stats(&self) -> CacheStats {
        self.communities.stats()
    }

    /// Assemble the frame for `t` (clamped into the domain).
    pub fn build_frame(&mut self, t: Timestep) -> Result<Frame, EngineError> {
        let snapshot = self.snapshots.get_snapshot(t);
        let timestep = snapshot.timestep;
        let partition = self
            .communities
            .get_partition(timestep, &snapshot)
            .map_err(|source| EngineError::Detector { timestep, source })?;
        let sizes = self.sizer.compute_sizes(&snapshot);
        let positions = centered_positions(&self.base_layout, &snapshot.nodes).map_err(|e| {
            EngineError::DataInconsistency {
                node: e.node,
                timestep,
            }
        })?;

        let mut nodes = Vec::with_capacity(positions.len());
        for (id, p) in &positions {
            let community = partition
                .community_of(id)
                .ok_or_else(|| EngineError::DataInconsistency {
                    node: id.clone(),
                    timestep,
                })?;
            let (size, degree) = sizes
                .get(id)
                .map_or((self.sizer.base, 0), |s| (s.size, s.degree));
            nodes.push(FrameNode {
                id: id.clone(),
                x: p.x,
                y: p.y,
                community,
                color: self.palette.color_for(community),
                size,
                degree,
            });
        }
        let edges = snapshot
            .edges
            .iter()
            .filter_map(|(a, b)| {
                let (pa, pb) = (positions.get(a)?, positions.get(b)?);
                Some(FrameEdge {
                    x0: pa.x,
                    y0: pa.y,
                    x1: pb.x,
                    y1: pb.y,
                })
            })
            .collect();

        debug!(
            timestep,
            nodes = nodes.len(),
            communities = partition.len(),
            "assembled frame"
        );
        Ok(Frame {
            timestep,
            edges,
            nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

    use super::*;
    use crate::error::DetectorError;
    use glam::DVec2;
    use ripple_graph::{MemoryEdgeStore, NodeId, TemporalEdge};
    use std::collections::BTreeSet;

    struct GridLayout;

    impl LayoutEngine for GridLayout {
        fn layout(&self, graph: &UndirectedGraph) -> BaseLayout {
            graph
                .nodes()
                .enumerate()
                .map(|(i, n)| (n.clone(), DVec2::new(i as f64, (i * i) as f64)))
                .collect()
        }
    }

    /// Lays out nothing, so every active node is missing.
    struct NoLayout;

    impl LayoutEngine for NoLayout {
        fn layout(&self, _: &UndirectedGraph) -> BaseLayout {
            BaseLayout::default()
        }
    }

    fn singletons(
        g: &UndirectedGraph,
        _: u64,
    ) -> Result<Vec<BTreeSet<NodeId>>, DetectorError> {
        Ok(g.nodes().map(|n| BTreeSet::from([n.clone()])).collect())
    }

    fn store() -> MemoryEdgeStore {
        [
            TemporalEdge::new("A", "B", 1, None),
            TemporalEdge::new("B", "C", 2, None),
            TemporalEdge::new("A", "C", 5, None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn domain_comes_from_store_with_overrides() {
        let e = PlaybackEngine::new(store(), singletons, &GridLayout, EngineOptions::default());
        assert_eq!(e.domain(), TimeDomain::new(1, 5));
        let opts = EngineOptions {
            max_timestep: Some(3),
            ..EngineOptions::default()
        };
        let e = PlaybackEngine::new(store(), singletons, &GridLayout, opts);
        assert_eq!(e.domain(), TimeDomain::new(1, 3));
    }

    #[test]
    fn late_min_override_becomes_the_wrap_target() {
        let opts = EngineOptions {
            min_timestep: Some(9),
            ..EngineOptions::default()
        };
        let mut e = PlaybackEngine::new(store(), singletons, &GridLayout, opts);
        assert_eq!(e.domain(), TimeDomain { min: 9, max: 9 });
        assert_eq!(e.build_frame(1).unwrap().timestep, 9);
    }

    #[test]
    fn frame_colors_wrap_and_sizes_follow_degree() {
        let opts = EngineOptions {
            palette_size: 2,
            ..EngineOptions::default()
        };
        let mut e = PlaybackEngine::new(store(), singletons, &GridLayout, opts);
        let f = e.build_frame(3).unwrap();
        assert_eq!(f.timestep, 3);
        assert_eq!(f.nodes.len(), 3);
        assert_eq!(f.edges.len(), 2);
        let palette = Palette::category20(2);
        for n in &f.nodes {
            assert_eq!(n.color, palette.color_for(n.community));
        }
        let b = f.nodes.iter().find(|n| n.id.as_str() == "B").unwrap();
        assert_eq!(b.degree, 2);
        assert!((b.size - 25.0).abs() < 1e-12);
        assert_eq!(f.nodes[2].color, f.nodes[0].color);
    }

    #[test]
    fn missing_layout_position_is_a_data_inconsistency() {
        let mut e = PlaybackEngine::new(store(), singletons, &NoLayout, EngineOptions::default());
        assert_eq!(
            e.build_frame(1),
            Err(EngineError::DataInconsistency {
                node: NodeId::from("A"),
                timestep: 1,
            })
        );
    }

    #[test]
    fn detector_failure_names_the_timestep() {
        let failing = |_: &UndirectedGraph, _: u64| -> Result<Vec<BTreeSet<NodeId>>, DetectorError> {
            Err(DetectorError::Failed("nope".into()))
        };
        let mut e = PlaybackEngine::new(store(), failing, &GridLayout, EngineOptions::default());
        let err = e.build_frame(2).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, EngineError::Detector { timestep: 2, .. }));
    }

    #[test]
    fn rebuilding_a_frame_hits_both_caches() {
        let mut e = PlaybackEngine::new(store(), singletons, &GridLayout, EngineOptions::default());
        let first = e.build_frame(5).unwrap();
        let second = e.build_frame(5).unwrap();
        assert_eq!(first, second);
        assert_eq!(e.snapshot_stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(e.partition_stats(), CacheStats { hits: 1, misses: 1 });
    }
}
