// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Play/pause state machine over a [`TimeDomain`].
//!
//! The controller never owns a timer. Starting playback hands out a
//! generation number; the caller's timer tags every tick with it, and
//! [`PlaybackController::on_tick`] ignores ticks from any other generation.
//! Once [`PlaybackController::toggle`] returns [`ToggleOutcome::Stopped`], no
//! further tick can move the cursor, even if one is already queued.

use ripple_graph::{TimeDomain, Timestep};
use tracing::info;

/// Whether the timer is meant to be running.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PlaybackMode {
    /// Paused; ticks are ignored.
    #[default]
    Idle,
    /// Playing; only ticks carrying `generation` advance the cursor.
    Playing {
        /// Identifies the timer started for this run.
        generation: u64,
    },
}

impl PlaybackMode {
    /// True while playing.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }
}

/// What a toggle did, so the caller can start or stop its timer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToggleOutcome {
    /// Playback started; tag timer ticks with `generation`.
    Started {
        /// Generation of the new run.
        generation: u64,
    },
    /// Playback stopped; cancel the timer.
    Stopped,
}

/// Mutable playback cursor and step settings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlaybackState {
    /// Timestep currently shown.
    pub current: Timestep,
    /// Manual scrub increment.
    pub step_size: Timestep,
    /// Per-tick increment while playing.
    pub animation_step_size: Timestep,
    /// Play/pause mode.
    pub mode: PlaybackMode,
}

/// Owns [`PlaybackState`] and applies every transition.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    domain: TimeDomain,
    state: PlaybackState,
    next_generation: u64,
}

impl PlaybackController {
    /// Idle at `domain.min` with both step sizes at 1.
    pub fn new(domain: TimeDomain) -> Self {
        Self {
            domain,
            state: PlaybackState {
                current: domain.min,
                step_size: 1,
                animation_step_size: 1,
                mode: PlaybackMode::Idle,
            },
            next_generation: 1,
        }
    }

    /// Snapshot of the state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Timestep currently shown.
    pub fn current(&self) -> Timestep {
        self.state.current
    }

    /// Domain the cursor is confined to.
    pub fn domain(&self) -> TimeDomain {
        self.domain
    }

    /// True while playing.
    pub fn is_playing(&self) -> bool {
        self.state.mode.is_playing()
    }

    /// Flip between idle and playing.
    pub fn toggle(&mut self) -> ToggleOutcome {
        match self.state.mode {
            PlaybackMode::Idle => {
                let generation = self.next_generation;
                self.next_generation += 1;
                self.state.mode = PlaybackMode::Playing { generation };
                info!(generation, at = self.state.current, "playback started");
                ToggleOutcome::Started { generation }
            }
            PlaybackMode::Playing { .. } => {
                self.state.mode = PlaybackMode::Idle;
                info!(at = self.state.current, "playback paused");
                ToggleOutcome::Stopped
            }
        }
    }

    /// Move forward by the animation step, wrapping to the domain minimum.
    ///
    /// Returns the new timestep, or `None` when idle.
    pub fn advance(&mut self) -> Option<Timestep> {
        if !self.is_playing() {
            return None;
        }
        let next = self
            .state
            .current
            .saturating_add(self.state.animation_step_size);
        self.state.current = if next >= self.domain.max {
            self.domain.min
        } else {
            next
        };
        Some(self.state.current)
    }

    /// Advance only for a tick of the current generation.
    pub fn on_tick(&mut self, generation: u64) -> Option<Timestep> {
        match self.state.mode {
            PlaybackMode::Playing { generation: g } if g == generation => self.advance(),
            _ => None,
        }
    }

    /// Scrub to `t` (clamped); play/pause mode is untouched.
    pub fn set_timestep(&mut self, t: Timestep) -> Timestep {
        self.state.current = self.domain.clamp(t);
        self.state.current
    }

    /// Set the manual scrub increment (at least 1).
    pub fn set_step_size(&mut self, s: Timestep) {
        self.state.step_size = s.max(1);
    }

    /// Set the per-tick increment (at least 1).
    pub fn set_animation_step_size(&mut self, s: Timestep) {
        self.state.animation_step_size = s.max(1);
    }

    /// Scrub forward by one step, clamped.
    pub fn step_forward(&mut self) -> Timestep {
        self.set_timestep(self.state.current.saturating_add(self.state.step_size))
    }

    /// Scrub back by one step, clamped.
    pub fn step_back(&mut self) -> Timestep {
        self.set_timestep(self.state.current.saturating_sub(self.state.step_size))
    }
}
