// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ripple-core: turns a temporal edge list into animated community frames.
//!
//! [`PlaybackEngine`] owns the per-timestep snapshot and partition caches, a
//! base layout computed once over the whole dataset, and the sizing and
//! colouring rules. [`PlaybackController`] is the play/pause state machine
//! that decides which timestep to build next. Both are plain owned values
//! with no shared state; drive them from a single event loop.

mod cache;
mod community;
mod engine;
mod error;
mod frame;
mod layout;
mod louvain;
mod palette;
mod playback;
mod prng;
mod sizer;
mod snapshot_builder;

pub use cache::{CachePolicy, CacheStats, TimestepCache};
pub use community::{CommunityCache, CommunityDetector, Partition};
pub use engine::{EngineOptions, PlaybackEngine};
pub use error::{DetectorError, EngineError, MissingNode};
pub use frame::{Frame, FrameEdge, FrameNode};
pub use layout::{centered_positions, BaseLayout, CenteredLayout, ForceLayout, LayoutEngine};
pub use louvain::LouvainDetector;
pub use palette::{ColorRgba8, Palette, CATEGORY20};
pub use playback::{PlaybackController, PlaybackMode, PlaybackState, ToggleOutcome};
pub use prng::Prng;
pub use sizer::{DegreeSizer, NodeSize, SizeMap};
pub use snapshot_builder::SnapshotBuilder;

pub use glam::DVec2;
