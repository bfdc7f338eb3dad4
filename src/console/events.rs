//! Console event loop
//!
//! Ticks from the playback clock and lines from stdin arrive on one channel
//! and are handled strictly in order, so no tick is ever processed while a
//! command is half-applied.

use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::commands::{parse_command, ConsoleCommand, HELP};
use super::render::FrameRenderer;
use crate::editing::dismissal::PointerTarget;
use crate::playback::ticker::TickScheduler;
use crate::playback::TickOutcome;
use crate::player::TranscriptPlayer;

/// Input to the console event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlayerEvent {
    /// Clock tick from schedule `generation`
    Tick { generation: u64 },
    /// One line typed by the user
    Line(String),
    /// Stdin reached end of file
    InputClosed,
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Message(String),
    Quit,
}

/// Spawn a task forwarding stdin lines into the event channel
pub(crate) fn spawn_input_reader(event_tx: mpsc::UnboundedSender<PlayerEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if event_tx.send(PlayerEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
        let _ = event_tx.send(PlayerEvent::InputClosed);
    });
}

/// Process events until the user quits or input ends
pub(crate) async fn run_event_loop<S, W>(
    player: &mut TranscriptPlayer<S>,
    mut event_rx: mpsc::UnboundedReceiver<PlayerEvent>,
    renderer: &mut FrameRenderer,
    out: &mut W,
) -> io::Result<()>
where
    S: TickScheduler,
    W: Write,
{
    renderer.render(&player.view(), out)?;

    while let Some(event) = event_rx.recv().await {
        match event {
            PlayerEvent::Tick { generation } => {
                if player.tick(generation) == TickOutcome::Finished {
                    renderer.message(out, "End of transcript")?;
                }
            }
            PlayerEvent::Line(line) => match handle_line(player, &line) {
                CommandOutcome::Continue => {}
                CommandOutcome::Message(text) => renderer.message(out, &text)?,
                CommandOutcome::Quit => break,
            },
            PlayerEvent::InputClosed => {
                info!("Input closed");
                break;
            }
        }

        renderer.render(&player.view(), out)?;
    }

    player.reset();
    writeln!(out)?;
    out.flush()
}

fn handle_line<S: TickScheduler>(player: &mut TranscriptPlayer<S>, line: &str) -> CommandOutcome {
    match parse_command(line) {
        Ok(Some(command)) => apply_command(player, command),
        Ok(None) => CommandOutcome::Continue,
        Err(e) => CommandOutcome::Message(e.to_string()),
    }
}

/// Translate a console command into pointer and player calls
fn apply_command<S: TickScheduler>(
    player: &mut TranscriptPlayer<S>,
    command: ConsoleCommand,
) -> CommandOutcome {
    match command {
        ConsoleCommand::TogglePlay => {
            player.pointer_down(PointerTarget::Controls);
            player.toggle_play();
        }
        ConsoleCommand::Reset => {
            player.pointer_down(PointerTarget::Controls);
            player.reset();
        }
        ConsoleCommand::Select(index) => {
            let target = if index < player.word_count() {
                PointerTarget::Token(index)
            } else {
                PointerTarget::Outside
            };
            player.pointer_down(target);
            if let Err(e) = player.select_word(index) {
                return CommandOutcome::Message(e.to_string());
            }
        }
        ConsoleCommand::Type(text) => {
            player.update_draft(text);
        }
        ConsoleCommand::Save => {
            player.pointer_down(PointerTarget::EditSurface);
            player.save_draft();
        }
        ConsoleCommand::Away => {
            player.pointer_down(PointerTarget::Outside);
        }
        ConsoleCommand::Show => return CommandOutcome::Message(String::new()),
        ConsoleCommand::Help => return CommandOutcome::Message(HELP.to_string()),
        ConsoleCommand::Quit => return CommandOutcome::Quit,
    }
    CommandOutcome::Continue
}
