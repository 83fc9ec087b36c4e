// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One-shot base layout and per-frame re-centering.
//!
//! The layout runs once over the union of every edge in the dataset. Frames
//! never re-run it; they only translate the base positions so the active
//! subset's centroid sits at the origin, which keeps relative arrangement
//! fixed across the whole animation.

use std::collections::{btree_map, BTreeMap};

use glam::DVec2;
use ripple_graph::{NodeId, UndirectedGraph};

use crate::error::MissingNode;
use crate::prng::Prng;

/// Per-frame positions for the active nodes only.
pub type CenteredLayout = BTreeMap<NodeId, DVec2>;

/// Computes positions for every node of a graph.
pub trait LayoutEngine {
    /// Position every node of `graph`.
    fn layout(&self, graph: &UndirectedGraph) -> BaseLayout;
}

/// Immutable reference positions, computed once per process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseLayout {
    positions: BTreeMap<NodeId, DVec2>,
}

impl BaseLayout {
    /// Position of `node`, if laid out.
    pub fn get(&self, node: &NodeId) -> Option<DVec2> {
        self.positions.get(node).copied()
    }

    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no node is positioned.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Ordered `(node, position)` pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, NodeId, DVec2> {
        self.positions.iter()
    }
}

impl<'a> IntoIterator for &'a BaseLayout {
    type Item = (&'a NodeId, &'a DVec2);
    type IntoIter = btree_map::Iter<'a, NodeId, DVec2>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

impl FromIterator<(NodeId, DVec2)> for BaseLayout {
    fn from_iter<I: IntoIterator<Item = (NodeId, DVec2)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Translate `base` so the mean position of `active` is the origin.
///
/// Only active nodes are returned. An empty `active` set yields an empty map.
pub fn centered_positions<'a>(
    base: &BaseLayout,
    active: impl IntoIterator<Item = &'a NodeId>,
) -> Result<CenteredLayout, MissingNode> {
    let mut out = CenteredLayout::new();
    let mut sum = DVec2::ZERO;
    for node in active {
        let p = base
            .get(node)
            .ok_or_else(|| MissingNode { node: node.clone() })?;
        sum += p;
        out.insert(node.clone(), p);
    }
    if out.is_empty() {
        return Ok(out);
    }
    #[allow(clippy::cast_precision_loss)]
    let centroid = sum / out.len() as f64;
    for p in out.values_mut() {
        *p -= centroid;
    }
    Ok(out)
}

/// Deterministic spring/repulsion relaxation.
///
/// Nodes start on a seeded disc, repel pairwise, and are pulled toward a rest
/// length along edges; the result is centred and scaled into the unit disc.
/// Cost is O(n²) per iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLayout {
    /// Relaxation steps.
    pub iterations: usize,
    /// Seed for the initial placement.
    pub seed: u64,
    /// Integration step.
    pub dt: f64,
    /// Preferred edge length in layout units before normalisation.
    pub rest_length: f64,
    /// Pairwise repulsion strength.
    pub repulsion: f64,
    /// Spring stiffness along edges.
    pub stiffness: f64,
    /// Velocity retained each step.
    pub damping: f64,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            iterations: 300,
            seed: 42,
            dt: 0.1,
            rest_length: 140.0,
            repulsion: 2400.0,
            stiffness: 0.08,
            damping: 0.9,
        }
    }
}

impl ForceLayout {
    fn initial_positions(&self, n: usize) -> Vec<DVec2> {
        let mut prng = Prng::from_seed(self.seed);
        (0..n)
            .map(|_| {
                let theta = prng.next_f64() * std::f64::consts::TAU;
                let r = 200.0 * prng.next_f64().sqrt();
                DVec2::new(r * theta.cos(), r * theta.sin())
            })
            .collect()
    }
}

impl LayoutEngine for ForceLayout {
    fn layout(&self, graph: &UndirectedGraph) -> BaseLayout {
        let ids: Vec<&NodeId> = graph.nodes().collect();
        let n = ids.len();
        if n == 0 {
            return BaseLayout::default();
        }
        let index: BTreeMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .filter(|(a, b)| a != b)
            .filter_map(|(a, b)| Some((*index.get(a)?, *index.get(b)?)))
            .collect();

        let mut pos = self.initial_positions(n);
        let mut vel = vec![DVec2::ZERO; n];
        let mut forces = vec![DVec2::ZERO; n];
        for _ in 0..self.iterations {
            forces.fill(DVec2::ZERO);
            for i in 0..n {
                for j in (i + 1)..n {
                    let delta = pos[i] - pos[j];
                    let dist2 = delta.length_squared().max(9.0);
                    let f = delta.normalize_or_zero() * (self.repulsion / dist2);
                    forces[i] += f;
                    forces[j] -= f;
                }
            }
            for &(a, b) in &edges {
                let delta = pos[b] - pos[a];
                let dist = delta.length().max(1.0);
                let f = (delta / dist) * ((dist - self.rest_length) * self.stiffness);
                forces[a] += f;
                forces[b] -= f;
            }
            for i in 0..n {
                vel[i] = (vel[i] + forces[i] * self.dt) * self.damping;
                pos[i] += vel[i] * self.dt;
            }
        }

        // Node counts stay far below 2^52, so the mean is exact enough.
        #[allow(clippy::cast_precision_loss)]
        let centroid = pos.iter().copied().sum::<DVec2>() / n as f64;
        let radius = pos
            .iter()
            .map(|p| (*p - centroid).length())
            .fold(0.0, f64::max);
        let scale = if radius > 0.0 { 1.0 / radius } else { 1.0 };
        ids.into_iter()
            .zip(pos)
            .map(|(id, p)| (id.clone(), (p - centroid) * scale))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use approx::assert_abs_diff_eq;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn base() -> BaseLayout {
        [
            (id("a"), DVec2::new(1.0, 1.0)),
            (id("b"), DVec2::new(3.0, 1.0)),
            (id("c"), DVec2::new(2.0, 4.0)),
            (id("far"), DVec2::new(100.0, -50.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn centering_uses_only_active_nodes() {
        let active = [id("a"), id("b"), id("c")];
        let centered = centered_positions(&base(), active.iter()).unwrap();
        assert_eq!(centered.len(), 3);
        assert!(!centered.contains_key(&id("far")));
        assert_abs_diff_eq!(centered[&id("a")].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(centered[&id("a")].y, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(centered[&id("c")].y, 2.0, epsilon = 1e-12);
        let mean = centered.values().copied().sum::<DVec2>() / 3.0;
        assert_abs_diff_eq!(mean.length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn centering_preserves_relative_offsets() {
        let b = base();
        let centered = centered_positions(&b, [id("a"), id("far")].iter()).unwrap();
        let before = b.get(&id("far")).unwrap() - b.get(&id("a")).unwrap();
        let after = centered[&id("far")] - centered[&id("a")];
        assert_abs_diff_eq!((before - after).length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_active_set_is_a_no_op() {
        let centered = centered_positions(&base(), std::iter::empty()).unwrap();
        assert!(centered.is_empty());
    }

    #[test]
    fn unknown_node_is_reported() {
        let err = centered_positions(&base(), [id("a"), id("ghost")].iter()).unwrap_err();
        assert_eq!(err.node, id("ghost"));
    }

    #[test]
    fn force_layout_is_deterministic_and_normalised() {
        let mut g = UndirectedGraph::default();
        for (a, b) in [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("e", "e")] {
            g.add_edge(id(a), id(b));
        }
        let engine = ForceLayout {
            iterations: 50,
            ..ForceLayout::default()
        };
        let first = engine.layout(&g);
        let second = engine.layout(&g);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        for (_, p) in &first {
            assert!(p.is_finite());
            assert!(p.length() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn force_layout_of_empty_graph_is_empty() {
        assert!(ForceLayout::default()
            .layout(&UndirectedGraph::default())
            .is_empty());
    }
}
