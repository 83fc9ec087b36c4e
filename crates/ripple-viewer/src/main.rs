// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ripple-viewer: headless player. Main wires config, dataset, engine, and the
//! stdin command reader into one session loop.

use anyhow::{Context, Result};
use clap::Parser;
use ripple_app_core::config::ConfigService;
use ripple_app_core::config_port::ConfigPort;
use ripple_app_core::prefs::RippleConfig;
use ripple_config_fs::FsConfigStore;
use ripple_core::{LouvainDetector, PlaybackEngine};
use ripple_graph::MemoryEdgeStore;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod frame_port;
mod session;
mod ticker;

use cli::Args;
use frame_port::LogFramePort;
use session::{PlaybackEvent, Session};

fn config_service(args: &Args) -> Result<ConfigService<FsConfigStore>> {
    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("opening config store")?;
    Ok(ConfigService::new(store))
}

/// Defaults, then stored settings, then flags.
fn resolve_config(args: &Args) -> Result<RippleConfig> {
    let stored = if args.no_config {
        None
    } else {
        match config_service(args) {
            Ok(svc) => svc.load_config().context("loading stored config")?,
            Err(err) => {
                warn!(error = %err, "config store unavailable; using defaults");
                None
            }
        }
    };
    let config = args.apply(stored.unwrap_or_default());
    config.validate().context("invalid settings")?;
    if args.save_config {
        config_service(args)?
            .save_config(&config)
            .context("saving config")?;
        info!("settings saved");
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let store = MemoryEdgeStore::from_csv_path(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;
    info!(edges = store.len(), path = %args.data.display(), "dataset loaded");

    let engine = PlaybackEngine::new(
        store,
        LouvainDetector::default(),
        &cli::layout_engine(&config),
        cli::engine_options(&config),
    );
    let port = LogFramePort::new(args.dump_dir)?;

    let (tx, rx) = mpsc::channel(64);
    let input = tokio::spawn(commands::forward_commands(
        BufReader::new(tokio::io::stdin()),
        tx.clone(),
    ));
    info!("{}", commands::HELP);
    if args.play {
        tx.send(PlaybackEvent::Play).await?;
    }

    let mut session = Session::new(engine, port, &config, tx, rx);
    let outcome = session.run().await;
    input.abort();
    info!(
        frames = session.port().presented(),
        at = session.controller().current(),
        "playback finished"
    );
    outcome.context("playback stopped")?;
    Ok(())
}
