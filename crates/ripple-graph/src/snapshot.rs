// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Materialized graphs: the directed per-timestep snapshot and its undirected
//! projection used for community detection, degree, and layout.

use std::collections::{BTreeMap, BTreeSet};

use crate::{EdgeStore, NodeId, TemporalEdge, TimeSemantics, Timestep};

/// Directed graph induced by the edges active at one timestep.
///
/// Node and edge sets are ordered so iteration (and everything derived from
/// it) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Timestep this snapshot was materialized for.
    pub timestep: Timestep,
    /// Endpoints of every active edge.
    pub nodes: BTreeSet<NodeId>,
    /// Active directed edges `(source, target)`; duplicates collapse.
    pub edges: BTreeSet<(NodeId, NodeId)>,
}

impl Snapshot {
    /// Scan `store` once and keep every edge active at `t`.
    pub fn from_store<S: EdgeStore>(
        store: &S,
        t: Timestep,
        semantics: TimeSemantics,
    ) -> Self {
        Self::from_edges(t, store.active_at(t, semantics))
    }

    /// Build a snapshot from an explicit edge sequence.
    pub fn from_edges<'a>(
        timestep: Timestep,
        edges: impl IntoIterator<Item = &'a TemporalEdge>,
    ) -> Self {
        let mut snap = Self {
            timestep,
            ..Self::default()
        };
        for e in edges {
            snap.nodes.insert(e.source.clone());
            snap.nodes.insert(e.target.clone());
            snap.edges.insert((e.source.clone(), e.target.clone()));
        }
        snap
    }

    /// True when no node is active.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of active nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Symmetric projection: `a -> b` and `b -> a` become one tie.
    pub fn undirected(&self) -> UndirectedGraph {
        let mut g = UndirectedGraph::default();
        for n in &self.nodes {
            g.add_node(n.clone());
        }
        for (a, b) in &self.edges {
            g.add_edge(a.clone(), b.clone());
        }
        g
    }
}

/// Simple undirected graph keyed by [`NodeId`].
///
/// Self-loops are tracked separately and count twice towards degree, the usual
/// convention for undirected multigraph degree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UndirectedGraph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    self_loops: BTreeSet<NodeId>,
}

impl UndirectedGraph {
    /// Union of every edge the store ever holds, regardless of time.
    pub fn from_store<S: EdgeStore>(store: &S) -> Self {
        let mut g = Self::default();
        for e in store.edges() {
            g.add_edge(e.source.clone(), e.target.clone());
        }
        g
    }

    /// Insert an isolated node (no-op if present).
    pub fn add_node(&mut self, n: NodeId) {
        self.adjacency.entry(n).or_default();
    }

    /// Insert an undirected tie, creating endpoints as needed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            self.self_loops.insert(a.clone());
            self.add_node(a);
            return;
        }
        self.adjacency.entry(a.clone()).or_default().insert(b.clone());
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Ordered node iterator.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Distinct neighbours of `n`, excluding `n` itself.
    pub fn neighbors(&self, n: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.adjacency.get(n).into_iter().flatten()
    }

    /// Whether `n` carries a self-loop.
    pub fn has_self_loop(&self, n: &NodeId) -> bool {
        self.self_loops.contains(n)
    }

    /// Undirected degree; 0 for unknown nodes.
    pub fn degree(&self, n: &NodeId) -> usize {
        let loops = if self.has_self_loop(n) { 2 } else { 0 };
        self.adjacency.get(n).map_or(0, BTreeSet::len) + loops
    }

    /// Number of undirected ties, self-loops included.
    pub fn edge_count(&self) -> usize {
        let pairs: usize = self.adjacency.values().map(BTreeSet::len).sum();
        pairs / 2 + self.self_loops.len()
    }

    /// Each undirected tie once, as `(lower, higher)`, self-loops as `(n, n)`.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        let ties = self
            .adjacency
            .iter()
            .flat_map(|(a, ns)| ns.iter().filter(move |b| a < *b).map(move |b| (a, b)));
        ties.chain(self.self_loops.iter().map(|n| (n, n)))
    }
}
