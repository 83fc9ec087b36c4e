// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-owner event loop: one event is handled to completion before the next.

use std::ops::ControlFlow;
use std::time::Duration;

use ripple_app_core::prefs::RippleConfig;
use ripple_core::{CommunityDetector, EngineError, PlaybackController, PlaybackEngine, ToggleOutcome};
use ripple_graph::{EdgeStore, Timestep};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::frame_port::FramePort;
use crate::ticker::Ticker;

/// Everything that can change what is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Scrub(Timestep),
    TogglePlay,
    /// Start playing; no-op when already playing.
    Play,
    /// Stop playing; no-op when idle.
    Pause,
    SetStepSize(Timestep),
    SetAnimationStepSize(Timestep),
    StepForward,
    StepBack,
    Tick {
        generation: u64,
    },
    Shutdown,
}

pub struct Session<S, D, P> {
    engine: PlaybackEngine<S, D>,
    controller: PlaybackController,
    port: P,
    ticker: Ticker,
    tx: mpsc::Sender<PlaybackEvent>,
    rx: mpsc::Receiver<PlaybackEvent>,
    last_digest: Option<[u8; 32]>,
}

impl<S, D, P> Session<S, D, P>
where
    S: EdgeStore,
    D: CommunityDetector,
    P: FramePort,
{
    /// `tx` must feed `rx`; the ticker posts through a clone of it.
    pub fn new(
        engine: PlaybackEngine<S, D>,
        port: P,
        config: &RippleConfig,
        tx: mpsc::Sender<PlaybackEvent>,
        rx: mpsc::Receiver<PlaybackEvent>,
    ) -> Self {
        let mut controller = PlaybackController::new(engine.domain());
        controller.set_step_size(config.step_size);
        controller.set_animation_step_size(config.animation_step_size);
        Self {
            engine,
            controller,
            port,
            ticker: Ticker::new(Duration::from_millis(config.timer_interval_ms.max(1))),
            tx,
            rx,
            last_digest: None,
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Present the initial frame, then process events until shutdown.
    ///
    /// Returns early only on errors that invalidate every later frame.
    pub async fn run(&mut self) -> Result<(), EngineError>
    where
        S: Send,
        D: Send,
        P: Send,
    {
        self.render(self.controller.current())?;
        while let Some(event) = self.rx.recv().await {
            if self.handle(event)?.is_break() {
                break;
            }
        }
        self.ticker.stop();
        info!("session ended");
        Ok(())
    }

    /// Handle everything already queued without waiting.
    #[cfg(test)]
    pub fn process_pending(&mut self) -> Result<ControlFlow<()>, EngineError> {
        while let Ok(event) = self.rx.try_recv() {
            if self.handle(event)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    pub fn handle(&mut self, event: PlaybackEvent) -> Result<ControlFlow<()>, EngineError> {
        debug!(?event, "event");
        match event {
            PlaybackEvent::Scrub(t) => {
                let t = self.controller.set_timestep(t);
                self.render(t)?;
            }
            PlaybackEvent::TogglePlay => self.toggle(),
            PlaybackEvent::Play if !self.controller.is_playing() => self.toggle(),
            PlaybackEvent::Pause if self.controller.is_playing() => self.toggle(),
            PlaybackEvent::Play | PlaybackEvent::Pause => {}
            PlaybackEvent::SetStepSize(s) => self.controller.set_step_size(s),
            PlaybackEvent::SetAnimationStepSize(s) => self.controller.set_animation_step_size(s),
            PlaybackEvent::StepForward => {
                let t = self.controller.step_forward();
                self.render(t)?;
            }
            PlaybackEvent::StepBack => {
                let t = self.controller.step_back();
                self.render(t)?;
            }
            PlaybackEvent::Tick { generation } => {
                if let Some(t) = self.controller.on_tick(generation) {
                    self.render(t)?;
                }
            }
            PlaybackEvent::Shutdown => {
                self.ticker.stop();
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn toggle(&mut self) {
        match self.controller.toggle() {
            ToggleOutcome::Started { generation } => self.ticker.start(generation, self.tx.clone()),
            ToggleOutcome::Stopped => self.ticker.stop(),
        }
    }

    fn render(&mut self, t: Timestep) -> Result<(), EngineError> {
        match self.engine.build_frame(t) {
            Ok(frame) => {
                let digest = *frame.digest().as_bytes();
                if self.last_digest != Some(digest) {
                    self.port.present(&frame);
                    self.last_digest = Some(digest);
                }
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                warn!(timestep = t, error = %err, "keeping previous frame");
                self.port.report_error(t, &err);
                Ok(())
            }
            Err(err) => {
                self.port.report_error(t, &err);
                Err(err)
            }
        }
    }
}
