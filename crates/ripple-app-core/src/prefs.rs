// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted playback settings shared by Ripple tools.

use ripple_graph::{TimeSemantics, Timestep};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Largest palette the categorical colour table provides.
pub const MAX_PALETTE_SIZE: usize = 20;

/// Everything a Ripple session can be tuned with.
///
/// Missing fields in a stored blob fall back to their defaults, so older
/// config files keep loading as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Rule deciding which edges are active at a timestep.
    pub time_semantics: TimeSemantics,
    /// Playback timer period in milliseconds.
    pub timer_interval_ms: u64,
    /// Seed handed to community detection and layout.
    pub seed: u64,
    /// Number of palette colours cycled through.
    pub palette_size: usize,
    /// Overrides the dataset's first timestep.
    pub min_timestep: Option<Timestep>,
    /// Overrides the dataset's last timestep.
    pub max_timestep: Option<Timestep>,
    /// Manual scrub increment.
    pub step_size: Timestep,
    /// Timesteps advanced per timer tick.
    pub animation_step_size: Timestep,
    /// Size of a zero-degree node.
    pub size_base: f64,
    /// Extra size of the busiest node in a frame.
    pub size_scale: f64,
    /// Per-cache timestep limit; `None` keeps everything.
    pub cache_capacity: Option<usize>,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            time_semantics: TimeSemantics::Cumulative,
            timer_interval_ms: 1000,
            seed: 42,
            palette_size: MAX_PALETTE_SIZE,
            min_timestep: None,
            max_timestep: None,
            step_size: 1,
            animation_step_size: 1,
            size_base: 10.0,
            size_scale: 15.0,
            cache_capacity: None,
        }
    }
}

impl RippleConfig {
    /// Reject values no session can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer_interval_ms == 0 {
            return Err(ConfigError::Invalid("timer_interval_ms must be at least 1".into()));
        }
        if !(1..=MAX_PALETTE_SIZE).contains(&self.palette_size) {
            return Err(ConfigError::Invalid(format!(
                "palette_size must be in 1..={MAX_PALETTE_SIZE}, got {}",
                self.palette_size
            )));
        }
        if self.step_size < 1 || self.animation_step_size < 1 {
            return Err(ConfigError::Invalid("step sizes must be at least 1".into()));
        }
        if !self.size_base.is_finite()
            || !self.size_scale.is_finite()
            || self.size_base < 0.0
            || self.size_scale < 0.0
        {
            return Err(ConfigError::Invalid(
                "size_base and size_scale must be finite and non-negative".into(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_timestep, self.max_timestep) {
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "min_timestep {min} is after max_timestep {max}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(RippleConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_blob_fills_in_defaults() {
        let cfg: RippleConfig =
            serde_json::from_str(r#"{"time_semantics":"interval","seed":7}"#).unwrap();
        assert_eq!(cfg.time_semantics, TimeSemantics::Interval);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.timer_interval_ms, 1000);
        assert_eq!(cfg.cache_capacity, None);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bad = [
            RippleConfig {
                timer_interval_ms: 0,
                ..RippleConfig::default()
            },
            RippleConfig {
                palette_size: 21,
                ..RippleConfig::default()
            },
            RippleConfig {
                animation_step_size: 0,
                ..RippleConfig::default()
            },
            RippleConfig {
                min_timestep: Some(9),
                max_timestep: Some(3),
                ..RippleConfig::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))), "{cfg:?}");
        }
    }
}
