// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Temporal interaction graph model shared across Ripple crates.
//! Pure data (temporal edges, time domains, per-timestep snapshots) plus the
//! read-only `EdgeStore` port the engine scans when materializing snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

mod snapshot;
mod store;

pub use snapshot::{Snapshot, UndirectedGraph};
pub use store::{EdgeStore, MemoryEdgeStore, StoreError};

/// Discrete time coordinate used by the dataset and the playback controller.
pub type Timestep = i64;

/// Opaque node identifier, kept exactly as it appears in the dataset.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Activation rule deciding whether an edge is part of the graph at a timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSemantics {
    /// Active once started, never deactivates (`time_start <= t`).
    #[default]
    Cumulative,
    /// Active only inside its window (`time_start <= t <= time_end`).
    Interval,
}

/// A directed interaction between two nodes starting at `time_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalEdge {
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// First timestep at which the interaction exists.
    pub time_start: Timestep,
    /// Last timestep of the interaction window, if bounded.
    #[serde(default)]
    pub time_end: Option<Timestep>,
}

impl TemporalEdge {
    /// Build an edge from raw parts.
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        time_start: Timestep,
        time_end: Option<Timestep>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            time_start,
            time_end,
        }
    }

    /// End of the activation window; unbounded point events end where they start.
    pub fn effective_end(&self) -> Timestep {
        self.time_end.unwrap_or(self.time_start)
    }

    /// Whether this edge belongs to the graph at `t` under `semantics`.
    pub fn is_active(&self, t: Timestep, semantics: TimeSemantics) -> bool {
        match semantics {
            TimeSemantics::Cumulative => self.time_start <= t,
            TimeSemantics::Interval => self.time_start <= t && t <= self.effective_end(),
        }
    }
}

/// Inclusive `[min, max]` range of valid timesteps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDomain {
    /// Smallest valid timestep.
    pub min: Timestep,
    /// Largest valid timestep.
    pub max: Timestep,
}

impl TimeDomain {
    /// Build a domain; swapped bounds are reordered.
    pub fn new(a: Timestep, b: Timestep) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Clamp `t` into the domain.
    pub fn clamp(&self, t: Timestep) -> Timestep {
        t.clamp(self.min, self.max)
    }

    /// Whether `t` lies inside the domain.
    pub fn contains(&self, t: Timestep) -> bool {
        (self.min..=self.max).contains(&t)
    }

    /// Replace either bound. An explicit bound is always honoured: a lone
    /// override past the opposite derived bound collapses the domain onto it.
    pub fn with_overrides(self, min: Option<Timestep>, max: Option<Timestep>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) => Self::new(lo, hi),
            (Some(lo), None) => Self {
                min: lo,
                max: self.max.max(lo),
            },
            (None, Some(hi)) => Self {
                min: self.min.min(hi),
                max: hi,
            },
            (None, None) => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_edges_never_deactivate() {
        let e = TemporalEdge::new("a", "b", 3, Some(4));
        assert!(!e.is_active(2, TimeSemantics::Cumulative));
        assert!(e.is_active(3, TimeSemantics::Cumulative));
        assert!(e.is_active(100, TimeSemantics::Cumulative));
    }

    #[test]
    fn interval_edges_respect_window() {
        let e = TemporalEdge::new("a", "b", 3, Some(5));
        assert!(!e.is_active(2, TimeSemantics::Interval));
        assert!(e.is_active(3, TimeSemantics::Interval));
        assert!(e.is_active(5, TimeSemantics::Interval));
        assert!(!e.is_active(6, TimeSemantics::Interval));

        let point = TemporalEdge::new("a", "b", 7, None);
        assert!(point.is_active(7, TimeSemantics::Interval));
        assert!(!point.is_active(8, TimeSemantics::Interval));
    }

    #[test]
    fn domain_clamps_and_reorders() {
        let d = TimeDomain::new(10, 2);
        assert_eq!(d, TimeDomain { min: 2, max: 10 });
        assert_eq!(d.clamp(-5), 2);
        assert_eq!(d.clamp(50), 10);
        assert_eq!(d.clamp(6), 6);
        assert_eq!(d.with_overrides(Some(4), None), TimeDomain { min: 4, max: 10 });
        assert_eq!(TimeDomain::default(), TimeDomain { min: 0, max: 0 });
    }

    #[test]
    fn lone_override_past_derived_bound_collapses_onto_it() {
        let derived = TimeDomain::new(1, 10);
        let late_start = derived.with_overrides(Some(20), None);
        assert_eq!(late_start, TimeDomain { min: 20, max: 20 });
        assert_eq!(late_start.clamp(1), 20);

        let early_end = derived.with_overrides(None, Some(-4));
        assert_eq!(early_end, TimeDomain { min: -4, max: -4 });
        assert_eq!(derived.with_overrides(None, None), derived);
        assert_eq!(derived.with_overrides(Some(8), Some(3)), TimeDomain { min: 3, max: 8 });
    }
}
