#![deny(clippy::all)]

mod config;
mod console;
mod editing;
mod error;
mod playback;
mod player;
mod preferences;
mod transcript;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use console::PlayerEvent;
use error::AppError;
use playback::ticker::TokioTicker;
use player::TranscriptPlayer;
use transcript::TranscriptStore;

/// Play back a timed transcript and correct words as it plays
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON array of {word, start_time, duration} records (milliseconds).
    /// Defaults to the transcript opened last time.
    transcript: Option<PathBuf>,

    /// Show each word's start and end time
    #[arg(long)]
    show_timings: bool,
}

/// Resolve which transcript to open and load it
fn open_transcript(requested: Option<PathBuf>) -> Result<(PathBuf, TranscriptStore), AppError> {
    let path = requested
        .or_else(preferences::get_last_transcript)
        .ok_or(AppError::NoTranscript)?;
    let store = TranscriptStore::load(&path)?;
    Ok((path, store))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't tear the console frame on stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = config::load_config().map_err(AppError::from)?;

    let (path, store) = open_transcript(args.transcript)?;
    if let Err(e) = preferences::set_last_transcript(&path) {
        warn!("Failed to remember transcript location: {}", e);
    }
    let show_timings = args.show_timings || preferences::get_show_timings();

    // Ticks and user input share one channel so they are handled in order
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let tick_tx = event_tx.clone();
    let ticker = TokioTicker::new(Arc::new(move |generation| {
        let _ = tick_tx.send(PlayerEvent::Tick { generation });
    }));

    let mut player = TranscriptPlayer::new(store, config.clock_settings(), ticker)
        .with_tick_logging(config.logging.log_ticks);
    info!(
        "Playing {:?}: {} words, {}ms step every {:?}",
        path,
        player.word_count(),
        config.playback.step_ms,
        config.clock_settings().period
    );

    console::spawn_input_reader(event_tx);
    console::run(&mut player, event_rx, show_timings)
        .await
        .context("Console output failed")?;

    info!("Quitting transcript player");
    // The stdin reader may still be parked in a blocking read; don't wait on it
    std::process::exit(0);
}
