// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Snapshot materialization under both activation rules.

use proptest::prelude::*;
use ripple_graph::{MemoryEdgeStore, NodeId, Snapshot, TemporalEdge, TimeSemantics};

fn pair(a: &str, b: &str) -> (NodeId, NodeId) {
    (NodeId::from(a), NodeId::from(b))
}

#[test]
fn cumulative_scenario_grows_over_time() {
    let store: MemoryEdgeStore = [
        TemporalEdge::new("A", "B", 1, None),
        TemporalEdge::new("B", "C", 2, None),
        TemporalEdge::new("A", "C", 5, None),
    ]
    .into_iter()
    .collect();

    let s1 = Snapshot::from_store(&store, 1, TimeSemantics::Cumulative);
    assert_eq!(
        s1.nodes.iter().map(NodeId::as_str).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
    assert_eq!(s1.edges.iter().cloned().collect::<Vec<_>>(), vec![pair("A", "B")]);

    let s3 = Snapshot::from_store(&store, 3, TimeSemantics::Cumulative);
    assert_eq!(s3.node_count(), 3);
    assert_eq!(
        s3.edges.iter().cloned().collect::<Vec<_>>(),
        vec![pair("A", "B"), pair("B", "C")]
    );

    let s5 = Snapshot::from_store(&store, 5, TimeSemantics::Cumulative);
    assert_eq!(s5.edge_count(), 3);
    assert!(s5.edges.contains(&pair("A", "C")));
}

#[test]
fn interval_scenario_drops_expired_edges() {
    let store: MemoryEdgeStore = [
        TemporalEdge::new("A", "B", 1, Some(2)),
        TemporalEdge::new("B", "C", 2, Some(6)),
    ]
    .into_iter()
    .collect();

    let s4 = Snapshot::from_store(&store, 4, TimeSemantics::Interval);
    assert_eq!(s4.edges.iter().cloned().collect::<Vec<_>>(), vec![pair("B", "C")]);
    assert!(!s4.nodes.contains(&NodeId::from("A")));

    let s9 = Snapshot::from_store(&store, 9, TimeSemantics::Interval);
    assert!(s9.is_empty());
}

#[test]
fn empty_store_yields_empty_snapshots() {
    let store = MemoryEdgeStore::default();
    for t in [-3, 0, 7] {
        let s = Snapshot::from_store(&store, t, TimeSemantics::Cumulative);
        assert!(s.is_empty());
        assert_eq!(s.edge_count(), 0);
    }
}

fn edge_strategy() -> impl Strategy<Value = TemporalEdge> {
    (0u8..8, 0u8..8, 0i64..50, 0i64..20).prop_map(|(a, b, start, len)| {
        TemporalEdge::new(format!("n{a}"), format!("n{b}"), start, Some(start + len))
    })
}

proptest! {
    #[test]
    fn cumulative_snapshots_are_monotone(
        edges in prop::collection::vec(edge_strategy(), 0..40),
        t1 in 0i64..60,
        dt in 0i64..30,
    ) {
        let store = MemoryEdgeStore::new(edges);
        let early = Snapshot::from_store(&store, t1, TimeSemantics::Cumulative);
        let late = Snapshot::from_store(&store, t1 + dt, TimeSemantics::Cumulative);
        prop_assert!(early.edges.is_subset(&late.edges));
        prop_assert!(early.nodes.is_subset(&late.nodes));
    }

    #[test]
    fn interval_snapshot_is_subset_of_cumulative(
        edges in prop::collection::vec(edge_strategy(), 0..40),
        t in 0i64..80,
    ) {
        let store = MemoryEdgeStore::new(edges);
        let interval = Snapshot::from_store(&store, t, TimeSemantics::Interval);
        let cumulative = Snapshot::from_store(&store, t, TimeSemantics::Cumulative);
        prop_assert!(interval.edges.is_subset(&cumulative.edges));
    }
}
