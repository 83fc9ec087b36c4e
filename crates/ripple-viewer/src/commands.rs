// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-oriented control commands read from stdin.

use anyhow::{anyhow, bail, Result};
use ripple_graph::Timestep;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::session::PlaybackEvent;

pub const HELP: &str =
    "commands: play | pause | toggle | seek <t> | step <s> | anim <s> | next | prev | quit";

/// Parse one command line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<PlaybackEvent>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        bail!("too many arguments: {line}");
    }
    let number = |name: &str| -> Result<Timestep> {
        let raw = arg.ok_or_else(|| anyhow!("`{name}` needs a number"))?;
        raw.parse()
            .map_err(|_| anyhow!("`{name}` expects an integer, got `{raw}`"))
    };
    let verb = verb.to_ascii_lowercase();
    let event = match verb.as_str() {
        "play" => PlaybackEvent::Play,
        "pause" => PlaybackEvent::Pause,
        "toggle" | "space" => PlaybackEvent::TogglePlay,
        "seek" => PlaybackEvent::Scrub(number("seek")?),
        "step" => PlaybackEvent::SetStepSize(number("step")?),
        "anim" => PlaybackEvent::SetAnimationStepSize(number("anim")?),
        "next" | "n" => PlaybackEvent::StepForward,
        "prev" | "p" => PlaybackEvent::StepBack,
        "quit" | "q" | "exit" => PlaybackEvent::Shutdown,
        other => bail!("unknown command `{other}`; {HELP}"),
    };
    if arg.is_some() && !matches!(verb.as_str(), "seek" | "step" | "anim") {
        bail!("`{verb}` takes no argument");
    }
    Ok(Some(event))
}

/// Forward parsed commands from `reader` until EOF or `quit`, then request shutdown.
pub async fn forward_commands<R>(reader: R, tx: mpsc::Sender<PlaybackEvent>) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(PlaybackEvent::Shutdown)) => break,
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(err) => warn!("{err}"),
        }
    }
    info!("input closed; shutting down");
    // The session may already be gone.
    let _ = tx.send(PlaybackEvent::Shutdown).await;
    Ok(())
}
