//! Interactive terminal front end
//!
//! Reads commands from stdin, drives the player, and redraws the transcript
//! with the active word highlighted.

mod commands;
mod events;
mod render;

pub(crate) use events::{spawn_input_reader, PlayerEvent};

use std::io;
use tokio::sync::mpsc;

use crate::playback::ticker::TickScheduler;
use crate::player::TranscriptPlayer;
use render::FrameRenderer;

/// Run the console until the user quits or stdin closes
pub(crate) async fn run<S: TickScheduler>(
    player: &mut TranscriptPlayer<S>,
    event_rx: mpsc::UnboundedReceiver<PlayerEvent>,
    show_timings: bool,
) -> io::Result<()> {
    let mut renderer = FrameRenderer::new(show_timings);
    let mut stdout = io::stdout().lock();
    renderer.message(&mut stdout, "Type 'help' for commands.")?;
    events::run_event_loop(player, event_rx, &mut renderer, &mut stdout).await
}
