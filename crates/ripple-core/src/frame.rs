// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Immutable render payload for one timestep.

use blake3::Hasher;
use ripple_graph::{NodeId, Timestep};
use serde::{Deserialize, Serialize};

use crate::palette::ColorRgba8;

/// One edge segment in centred coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameEdge {
    /// Source x.
    pub x0: f64,
    /// Source y.
    pub y0: f64,
    /// Target x.
    pub x1: f64,
    /// Target y.
    pub y1: f64,
}

/// One node point in centred coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    /// Node identifier.
    pub id: NodeId,
    /// Centred x.
    pub x: f64,
    /// Centred y.
    pub y: f64,
    /// Index of the node's community in this timestep's partition.
    pub community: usize,
    /// Fill colour derived from `community`.
    pub color: ColorRgba8,
    /// Rendered size.
    pub size: f64,
    /// Undirected degree within the snapshot.
    pub degree: usize,
}

/// Everything a renderer needs to draw one timestep.
///
/// Nodes are ordered by id and edges follow the snapshot's edge order, so two
/// frames built from the same inputs compare equal and share a digest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Timestep after clamping.
    pub timestep: Timestep,
    /// Edge segments.
    pub edges: Vec<FrameEdge>,
    /// Node points.
    pub nodes: Vec<FrameNode>,
}

impl Frame {
    /// Whether the frame draws nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Tooltip payload: `(id, community, degree)` per node.
    pub fn hover(&self) -> impl Iterator<Item = (&NodeId, usize, usize)> {
        self.nodes.iter().map(|n| (&n.id, n.community, n.degree))
    }

    /// Content hash over every field, used to skip re-presenting identical frames.
    pub fn digest(&self) -> blake3::Hash {
        let mut h = Hasher::new();
        h.update(&self.timestep.to_le_bytes());
        h.update(&(self.nodes.len() as u64).to_le_bytes());
        for n in &self.nodes {
            let id = n.id.as_str().as_bytes();
            h.update(&(id.len() as u64).to_le_bytes());
            h.update(id);
            h.update(&n.x.to_bits().to_le_bytes());
            h.update(&n.y.to_bits().to_le_bytes());
            h.update(&(n.community as u64).to_le_bytes());
            h.update(&n.color);
            h.update(&n.size.to_bits().to_le_bytes());
            h.update(&(n.degree as u64).to_le_bytes());
        }
        h.update(&(self.edges.len() as u64).to_le_bytes());
        for e in &self.edges {
            for v in [e.x0, e.y0, e.x1, e.y1] {
                h.update(&v.to_bits().to_le_bytes());
            }
        }
        h.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, community: usize) -> FrameNode {
        FrameNode {
            id: NodeId::from(id),
            x: 0.5,
            y: -0.5,
            community,
            color: [1, 2, 3, 255],
            size: 10.0,
            degree: 1,
        }
    }

    #[test]
    fn digest_tracks_content() {
        let a = Frame {
            timestep: 3,
            edges: vec![FrameEdge {
                x0: 0.0,
                y0: 0.0,
                x1: 1.0,
                y1: 1.0,
            }],
            nodes: vec![node("a", 0), node("b", 0)],
        };
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        b.nodes[1].community = 1;
        assert_ne!(a.digest(), b.digest());
        let mut c = a.clone();
        c.timestep = 4;
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn hover_lists_every_node() {
        let f = Frame {
            timestep: 0,
            edges: Vec::new(),
            nodes: vec![node("x", 2)],
        };
        let hover: Vec<_> = f.hover().collect();
        assert_eq!(hover, vec![(&NodeId::from("x"), 2, 1)]);
        assert!(!f.is_empty());
        assert!(Frame::default().is_empty());
    }
}
