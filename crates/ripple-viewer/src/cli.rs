// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line arguments and their merge into stored settings.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ripple_app_core::prefs::RippleConfig;
use ripple_core::{CachePolicy, DegreeSizer, EngineOptions, ForceLayout};
use ripple_graph::{TimeSemantics, Timestep};

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Ripple: animated community playback for temporal interaction networks")]
pub struct Args {
    /// CSV with `Source,Target,time_start[,time_end]` columns
    pub data: PathBuf,
    /// Edge activation rule
    #[arg(long, value_enum)]
    pub semantics: Option<SemanticsArg>,
    /// Playback timer period in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Seed for community detection and layout
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of palette colours (1-20)
    #[arg(long)]
    pub palette_size: Option<usize>,
    /// First timestep (defaults to the dataset's earliest start)
    #[arg(long, allow_hyphen_values = true)]
    pub min_timestep: Option<Timestep>,
    /// Last timestep (defaults to the dataset's latest end)
    #[arg(long, allow_hyphen_values = true)]
    pub max_timestep: Option<Timestep>,
    /// Manual scrub increment
    #[arg(long)]
    pub step_size: Option<Timestep>,
    /// Timesteps advanced per timer tick
    #[arg(long)]
    pub animation_step_size: Option<Timestep>,
    /// Size of an isolated node
    #[arg(long)]
    pub size_base: Option<f64>,
    /// Extra size of the busiest node
    #[arg(long)]
    pub size_scale: Option<f64>,
    /// Keep at most this many timesteps per cache (0 = unbounded)
    #[arg(long)]
    pub cache_capacity: Option<usize>,
    /// Write every presented frame as JSON into this directory
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,
    /// Read and write settings here instead of the platform config dir
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
    /// Ignore stored settings
    #[arg(long)]
    pub no_config: bool,
    /// Persist the merged settings before starting
    #[arg(long)]
    pub save_config: bool,
    /// Start playing immediately
    #[arg(long)]
    pub play: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SemanticsArg {
    Cumulative,
    Interval,
}

impl From<SemanticsArg> for TimeSemantics {
    fn from(value: SemanticsArg) -> Self {
        match value {
            SemanticsArg::Cumulative => Self::Cumulative,
            SemanticsArg::Interval => Self::Interval,
        }
    }
}

impl Args {
    /// Layer explicit flags over `base`.
    pub fn apply(&self, mut base: RippleConfig) -> RippleConfig {
        if let Some(s) = self.semantics {
            base.time_semantics = s.into();
        }
        if let Some(v) = self.interval_ms {
            base.timer_interval_ms = v;
        }
        if let Some(v) = self.seed {
            base.seed = v;
        }
        if let Some(v) = self.palette_size {
            base.palette_size = v;
        }
        if self.min_timestep.is_some() {
            base.min_timestep = self.min_timestep;
        }
        if self.max_timestep.is_some() {
            base.max_timestep = self.max_timestep;
        }
        if let Some(v) = self.step_size {
            base.step_size = v;
        }
        if let Some(v) = self.animation_step_size {
            base.animation_step_size = v;
        }
        if let Some(v) = self.size_base {
            base.size_base = v;
        }
        if let Some(v) = self.size_scale {
            base.size_scale = v;
        }
        if let Some(v) = self.cache_capacity {
            base.cache_capacity = (v > 0).then_some(v);
        }
        base
    }
}

pub fn engine_options(config: &RippleConfig) -> EngineOptions {
    EngineOptions {
        semantics: config.time_semantics,
        seed: config.seed,
        palette_size: config.palette_size,
        min_timestep: config.min_timestep,
        max_timestep: config.max_timestep,
        cache: CachePolicy::from_capacity(config.cache_capacity),
        sizer: DegreeSizer::new(config.size_base, config.size_scale),
    }
}

pub fn layout_engine(config: &RippleConfig) -> ForceLayout {
    ForceLayout {
        seed: config.seed,
        ..ForceLayout::default()
    }
}
