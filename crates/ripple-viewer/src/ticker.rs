// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cancellable playback timer that posts generation-tagged ticks.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::session::PlaybackEvent;

/// Owns at most one interval task at a time.
pub struct Ticker {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    /// Replace any running timer with one tagging ticks as `generation`.
    pub fn start(&mut self, generation: u64, tx: mpsc::Sender<PlaybackEvent>) {
        self.stop();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() completes its first tick immediately; the first
            // advance should happen one full period after play.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(PlaybackEvent::Tick { generation }).await.is_err() {
                    break;
                }
            }
        }));
    }

    /// Abort the timer task. Ticks already queued are left for the
    /// controller's generation check to discard.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
