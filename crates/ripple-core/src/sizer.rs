// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Degree-proportional node sizes.

use std::collections::BTreeMap;

use ripple_graph::{NodeId, Snapshot};

/// Per-node visual size plus the degree it was derived from.
pub type SizeMap = BTreeMap<NodeId, NodeSize>;

/// Size entry for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    /// Undirected degree in the snapshot.
    pub degree: usize,
    /// Rendered size, `base + scale * degree / max_degree`.
    pub size: f64,
}

/// Maps degree to size relative to the busiest node of the same snapshot.
///
/// Sizes are comparable within a frame only; the largest node of every frame
/// gets `base + scale` regardless of its absolute degree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeSizer {
    /// Size of a degree-0 node.
    pub base: f64,
    /// Extra size granted to the maximum-degree node.
    pub scale: f64,
}

impl Default for DegreeSizer {
    fn default() -> Self {
        Self {
            base: 10.0,
            scale: 15.0,
        }
    }
}

impl DegreeSizer {
    /// Sizer with explicit calibration.
    pub fn new(base: f64, scale: f64) -> Self {
        Self { base, scale }
    }

    /// Size every node of `snapshot` using its undirected degree.
    // Degrees stay far below 2^52, so the ratio is exact enough.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute_sizes(&self, snapshot: &Snapshot) -> SizeMap {
        let graph = snapshot.undirected();
        let degrees: Vec<(&NodeId, usize)> = snapshot
            .nodes
            .iter()
            .map(|n| (n, graph.degree(n)))
            .collect();
        let max_degree = degrees.iter().map(|(_, d)| *d).max().unwrap_or(0);
        degrees
            .into_iter()
            .map(|(n, degree)| {
                let size = if max_degree == 0 {
                    self.base
                } else {
                    self.base + self.scale * (degree as f64 / max_degree as f64)
                };
                (n.clone(), NodeSize { degree, size })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_graph::TemporalEdge;

    #[test]
    fn hub_gets_full_size_and_leaves_scale_down() {
        let edges = [
            TemporalEdge::new("hub", "a", 0, None),
            TemporalEdge::new("hub", "b", 0, None),
            TemporalEdge::new("c", "hub", 0, None),
            TemporalEdge::new("a", "hub", 0, None),
        ];
        let snap = Snapshot::from_edges(0, edges.iter());
        let sizes = DegreeSizer::default().compute_sizes(&snap);
        let hub = sizes[&NodeId::from("hub")];
        assert_eq!(hub.degree, 3);
        assert!((hub.size - 25.0).abs() < 1e-12);
        // reciprocal a<->hub counts once
        let a = sizes[&NodeId::from("a")];
        assert_eq!(a.degree, 1);
        assert!((a.size - 15.0).abs() < 1e-12);
    }

    #[test]
    fn empty_snapshot_has_no_sizes() {
        assert!(DegreeSizer::default()
            .compute_sizes(&Snapshot::default())
            .is_empty());
    }

    #[test]
    fn zero_max_degree_falls_back_to_base() {
        let mut snap = Snapshot::default();
        snap.nodes.insert(NodeId::from("lonely"));
        let sizes = DegreeSizer::new(4.0, 9.0).compute_sizes(&snap);
        assert!((sizes[&NodeId::from("lonely")].size - 4.0).abs() < f64::EPSILON);
    }
}
