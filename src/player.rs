//! Transcript player
//!
//! Combines the transcript store, playback clock, edit session and dismissal
//! controller behind the command surface used by the front end. All commands
//! run to completion synchronously; ticks arrive through the same owner and
//! are handled one at a time.

use crate::editing::dismissal::{DismissalController, PointerTarget};
use crate::editing::{EditError, EditSession, EditView};
use crate::playback::ticker::TickScheduler;
use crate::playback::{format_elapsed, ClockSettings, PlaybackClock, TickOutcome};
use crate::transcript::resolver;
use crate::transcript::{TranscriptSnapshot, TranscriptStore};
use tracing::{debug, warn};

/// Everything the front end needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlayerView {
    pub elapsed_ms: u64,
    pub elapsed_label: String,
    pub running: bool,
    pub active_index: Option<usize>,
    pub edit: Option<EditView>,
    pub transcript: TranscriptSnapshot,
}

/// Rejected player commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum PlayerError {
    #[error("Word index {index} is out of range (transcript has {len} words)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<EditError> for PlayerError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::IndexOutOfRange { index, len } => Self::IndexOutOfRange { index, len },
        }
    }
}

pub(crate) struct TranscriptPlayer<S: TickScheduler> {
    store: TranscriptStore,
    clock: PlaybackClock<S>,
    edit: EditSession,
    dismissal: DismissalController,
    log_ticks: bool,
}

impl<S: TickScheduler> TranscriptPlayer<S> {
    pub(crate) fn new(store: TranscriptStore, settings: ClockSettings, scheduler: S) -> Self {
        let clock = PlaybackClock::new(settings, store.end_time(), scheduler);
        Self {
            store,
            clock,
            edit: EditSession::new(),
            dismissal: DismissalController::new(),
            log_ticks: false,
        }
    }

    /// Emit a debug line on every clock tick
    pub(crate) fn with_tick_logging(mut self, log_ticks: bool) -> Self {
        self.log_ticks = log_ticks;
        self
    }

    pub(crate) fn word_count(&self) -> usize {
        self.store.len()
    }

    /// Start playback when stopped, stop it when running
    pub(crate) fn toggle_play(&mut self) {
        if self.clock.is_running() {
            self.clock.stop();
        } else {
            self.clock.start();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.clock.reset();
    }

    /// Open the editor on word `index`, pausing playback first
    pub(crate) fn select_word(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.store.len() {
            let err = PlayerError::IndexOutOfRange {
                index,
                len: self.store.len(),
            };
            warn!("Rejected word selection: {}", err);
            return Err(err);
        }

        self.clock.stop();
        self.edit.open(index, &self.store)?;
        self.dismissal.arm(index);
        Ok(())
    }

    /// Replace the draft text. No-op when nothing is being edited.
    pub(crate) fn update_draft(&mut self, text: impl Into<String>) -> bool {
        self.edit.update_draft(text)
    }

    /// Commit the draft. No-op when nothing is being edited.
    pub(crate) fn save_draft(&mut self) -> Option<usize> {
        let committed = self.edit.commit(&mut self.store);
        self.dismissal.disarm();
        committed
    }

    /// Route a pointer-down; returns true if it closed the editor
    pub(crate) fn pointer_down(&mut self, target: PointerTarget) -> bool {
        self.dismissal.on_pointer_down(target, &mut self.edit)
    }

    /// Deliver a clock tick from schedule `generation`
    pub(crate) fn tick(&mut self, generation: u64) -> TickOutcome {
        let outcome = self.clock.tick(generation);
        if self.log_ticks {
            if let TickOutcome::Advanced(elapsed_ms) = outcome {
                let tokens = self.store.snapshot();
                debug!(
                    "Tick: {}ms, active word {:?}",
                    elapsed_ms,
                    resolver::resolve(elapsed_ms, &tokens)
                );
            }
        }
        outcome
    }

    pub(crate) fn view(&self) -> PlayerView {
        let state = self.clock.state();
        let transcript = self.store.snapshot();
        PlayerView {
            elapsed_ms: state.elapsed_ms,
            elapsed_label: format_elapsed(state.elapsed_ms),
            running: state.running,
            active_index: resolver::resolve(state.elapsed_ms, &transcript),
            edit: self.edit.view(),
            transcript,
        }
    }

    #[cfg(test)]
    pub(crate) fn dismissal(&self) -> &DismissalController {
        &self.dismissal
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> &PlaybackClock<S> {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ticker::ManualScheduler;
    use crate::playback::PlaybackState;
    use crate::transcript::{sample_store, Token};
    use std::sync::Arc;

    fn player() -> TranscriptPlayer<ManualScheduler> {
        TranscriptPlayer::new(
            sample_store(),
            ClockSettings::default(),
            ManualScheduler::default(),
        )
    }

    fn generation(player: &TranscriptPlayer<ManualScheduler>) -> u64 {
        player.clock().scheduler().active.expect("schedule active").1
    }

    fn advance(player: &mut TranscriptPlayer<ManualScheduler>, ticks: usize) {
        let generation = generation(player);
        for _ in 0..ticks {
            player.tick(generation);
        }
    }

    #[test]
    fn test_initial_view() {
        let view = player().view();
        assert_eq!(view.elapsed_label, "0.0s");
        assert!(!view.running);
        assert_eq!(view.active_index, Some(0));
        assert!(view.edit.is_none());
        assert_eq!(view.transcript.len(), 2);
    }

    #[test]
    fn test_toggle_play() {
        let mut player = player();
        player.toggle_play();
        assert!(player.view().running);
        player.toggle_play();
        assert!(!player.view().running);
    }

    #[test]
    fn test_highlight_follows_ticks_then_auto_resets() {
        let mut player = player();
        player.toggle_play();
        let generation = generation(&player);

        advance(&mut player, 10);
        assert_eq!(player.view().elapsed_ms, 500);
        assert_eq!(player.view().active_index, Some(1));

        advance(&mut player, 10);
        let view = player.view();
        assert_eq!(view.elapsed_ms, 1000);
        assert_eq!(view.active_index, None);
        assert!(view.running);

        assert_eq!(player.tick(generation), TickOutcome::Finished);
        let view = player.view();
        assert_eq!(view.elapsed_ms, 0);
        assert!(!view.running);
    }

    #[test]
    fn test_select_word_pauses_playback() {
        let mut player = player();
        player.toggle_play();
        let generation = generation(&player);
        advance(&mut player, 3);

        player.select_word(1).unwrap();
        let view = player.view();
        assert!(!view.running);
        assert_eq!(view.elapsed_ms, 150);
        assert_eq!(
            view.edit,
            Some(EditView {
                index: 1,
                draft: "there".to_string()
            })
        );

        // Ticks already in flight no longer advance time
        assert_eq!(player.tick(generation), TickOutcome::Stale);
        assert_eq!(player.view().elapsed_ms, 150);
    }

    #[test]
    fn test_select_word_out_of_range_is_rejected_without_side_effects() {
        let mut player = player();
        player.toggle_play();

        assert_eq!(
            player.select_word(5),
            Err(PlayerError::IndexOutOfRange { index: 5, len: 2 })
        );
        let view = player.view();
        assert!(view.running);
        assert!(view.edit.is_none());
        assert_eq!(player.dismissal().active_listeners(), 0);
    }

    #[test]
    fn test_edit_and_save() {
        let mut player = player();
        let before = player.view().transcript;

        player.select_word(0).unwrap();
        assert!(player.update_draft("hello"));
        assert_eq!(player.save_draft(), Some(0));

        let view = player.view();
        assert!(view.edit.is_none());
        assert_eq!(
            view.transcript
                .iter()
                .map(|token| token.as_ref().clone())
                .collect::<Vec<_>>(),
            vec![Token::new("hello", 0, 500), Token::new("there", 500, 500)]
        );
        assert!(Arc::ptr_eq(&before[1], &view.transcript[1]));
        assert_eq!(player.dismissal().active_listeners(), 0);
    }

    #[test]
    fn test_second_select_replaces_first() {
        let mut player = player();
        player.select_word(0).unwrap();
        player.update_draft("abandoned");
        player.select_word(1).unwrap();

        assert_eq!(
            player.view().edit,
            Some(EditView {
                index: 1,
                draft: "there".to_string()
            })
        );
        assert_eq!(player.dismissal().active_listeners(), 1);

        // Saving commits only the second word
        player.update_draft("where");
        assert_eq!(player.save_draft(), Some(1));
        let view = player.view();
        assert_eq!(view.transcript[0].word, "hi");
        assert_eq!(view.transcript[1].word, "where");
    }

    #[test]
    fn test_outside_click_discards_draft() {
        let mut player = player();
        let before = player.view().transcript;
        player.select_word(0).unwrap();
        player.update_draft("nope");

        assert!(!player.pointer_down(PointerTarget::EditSurface));
        assert!(player.pointer_down(PointerTarget::Outside));

        let view = player.view();
        assert!(view.edit.is_none());
        assert!(Arc::ptr_eq(&before, &view.transcript));
        assert_eq!(player.dismissal().active_listeners(), 0);
    }

    #[test]
    fn test_idle_commands_are_noops() {
        let mut player = player();
        let before = player.view();

        assert!(!player.update_draft("x"));
        assert_eq!(player.save_draft(), None);
        assert!(!player.pointer_down(PointerTarget::Outside));
        assert_eq!(player.view(), before);
    }

    #[test]
    fn test_reset_twice_matches_once() {
        let mut player = player();
        player.toggle_play();
        advance(&mut player, 4);

        player.reset();
        let once = player.clock().state();
        player.reset();
        assert_eq!(player.clock().state(), once);
        assert_eq!(once, PlaybackState::default());
    }
}
