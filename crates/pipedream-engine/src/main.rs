//! # PipeDream
//!
//! Headless runner for the PipeDream show.
//!
//! Plays the whole show against a simulated soundtrack: a tracing canvas
//! logs what would be drawn, and the process exits once the soundtrack ended
//! and the replay control is on stage.
//!
//! Usage: `pipedream [CONFIG]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use pipedream_engine::program::background_asset;
use pipedream_engine::{
    MediaEvent, Sequencer, ShowConfig, ShowProgram, SimulatedPlayback, Stage, SystemDesktop,
    Theatre, TraceCanvas, TweenAnimator,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => ShowConfig::load_from(PathBuf::from(path)),
        None => ShowConfig::load(),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .init();

    info!("PipeDream starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    run(&config)?;

    info!("PipeDream shutdown complete");
    Ok(())
}

fn run(config: &ShowConfig) -> Result<()> {
    let stage = Stage::new(
        config.stage_bounds(),
        Box::new(TraceCanvas::new()),
        Box::new(TweenAnimator::new()),
        config.tick_interval(),
    )
    .into_shared();

    let program = ShowProgram::from_config(config, Arc::new(SystemDesktop));
    let sequencer =
        Sequencer::new(stage, program, config.tick_interval()).with_background(background_asset());
    let mut theatre = Theatre::new(sequencer);

    let (tx, rx) = unbounded();
    theatre.start().context("Failed to start the show")?;
    let mut playback = SimulatedPlayback::new(config.show_length_secs, config.playback_rate)
        .play(tx)
        .context("Failed to start playback")?;

    for event in &rx {
        theatre.handle(event);
        if let MediaEvent::StatusChanged(status) = event {
            info!(?status, "Media");
        }
        if theatre.replay_visible() {
            break;
        }
    }

    playback.stop();
    playback.join().context("Playback thread failed")?;
    theatre.shutdown().context("Failed to stop the show")?;
    Ok(())
}
