// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for frame assembly and its collaborators.

use ripple_graph::{NodeId, Timestep};
use thiserror::Error;

/// Failure reported by a [`CommunityDetector`](crate::CommunityDetector).
///
/// Detection is deterministic for a fixed snapshot and seed, so none of these
/// are worth retrying without changing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    /// The algorithm itself gave up.
    #[error("community detection failed: {0}")]
    Failed(String),
    /// The detector returned groups that do not partition the snapshot.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),
}

/// A node was requested from the base layout but has no position there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node {node} has no base layout position")]
pub struct MissingNode {
    /// The node without a position.
    pub node: NodeId,
}

/// Errors surfaced by [`PlaybackEngine::build_frame`](crate::PlaybackEngine::build_frame).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The base layout does not cover a node active at `timestep`; the layout
    /// must be computed over every node the dataset ever mentions.
    #[error("data inconsistency at timestep {timestep}: node {node} is missing from the base layout")]
    DataInconsistency {
        /// Offending node.
        node: NodeId,
        /// Timestep whose snapshot contained it.
        timestep: Timestep,
    },
    /// The community detector failed for `timestep`.
    #[error("community detection failed at timestep {timestep}: {source}")]
    Detector {
        /// Timestep being assembled.
        timestep: Timestep,
        /// Underlying detector error.
        #[source]
        source: DetectorError,
    },
}

impl EngineError {
    /// Whether playback may continue after this error (keeping the last frame).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Detector { .. })
    }
}
