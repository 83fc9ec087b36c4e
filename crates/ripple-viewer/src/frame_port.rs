// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer sink the session publishes frames to.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ripple_core::{EngineError, Frame};
use ripple_graph::Timestep;
use tracing::{debug, error, info, warn};

/// Where assembled frames and assembly failures go.
pub trait FramePort {
    /// Show a new frame.
    fn present(&mut self, frame: &Frame);
    /// Surface a failure; the previously presented frame stays current.
    fn report_error(&mut self, timestep: Timestep, error: &EngineError);
}

/// Logs a summary of every frame and optionally dumps it as JSON.
pub struct LogFramePort {
    dump_dir: Option<PathBuf>,
    presented: u64,
}

impl LogFramePort {
    pub fn new(dump_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = &dump_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating frame dump dir {}", dir.display()))?;
        }
        Ok(Self {
            dump_dir,
            presented: 0,
        })
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn dump(&self, frame: &Frame) -> Result<()> {
        let Some(dir) = &self.dump_dir else {
            return Ok(());
        };
        let path = dir.join(format!("frame-{:06}.json", frame.timestep));
        let bytes = serde_json::to_vec_pretty(frame)?;
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl FramePort for LogFramePort {
    fn present(&mut self, frame: &Frame) {
        self.presented += 1;
        let communities: BTreeSet<usize> = frame.nodes.iter().map(|n| n.community).collect();
        info!(
            timestep = frame.timestep,
            nodes = frame.nodes.len(),
            edges = frame.edges.len(),
            communities = communities.len(),
            "frame"
        );
        for (id, community, degree) in frame.hover() {
            debug!(node = %id, community, degree, "hover");
        }
        if let Err(err) = self.dump(frame) {
            warn!(error = %err, "frame dump failed");
        }
    }

    fn report_error(&mut self, timestep: Timestep, error: &EngineError) {
        error!(timestep, error = %error, "frame assembly failed");
    }
}
