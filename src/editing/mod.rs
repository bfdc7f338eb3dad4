//! Single-slot word editing
//!
//! At most one token is under correction at a time. The draft is a private
//! copy of the word and only reaches the transcript on commit.

pub(crate) mod dismissal;

use crate::transcript::TranscriptStore;
use tracing::info;

/// Edit session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum EditState {
    #[default]
    Idle,
    Editing {
        index: usize,
        draft: String,
    },
}

/// Read-only view of an open edit, for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditView {
    pub index: usize,
    pub draft: String,
}

/// Holder of the one edit slot
#[derive(Debug, Default)]
pub(crate) struct EditSession {
    state: EditState,
}

impl EditSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &EditState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub(crate) fn view(&self) -> Option<EditView> {
        match &self.state {
            EditState::Idle => None,
            EditState::Editing { index, draft } => Some(EditView {
                index: *index,
                draft: draft.clone(),
            }),
        }
    }

    /// Open the token at `index`, replacing any draft already open
    ///
    /// The caller is responsible for pausing playback first.
    pub(crate) fn open(
        &mut self,
        index: usize,
        store: &TranscriptStore,
    ) -> Result<(), EditError> {
        let token = store.get(index).ok_or(EditError::IndexOutOfRange {
            index,
            len: store.len(),
        })?;

        if let EditState::Editing { index: previous, .. } = self.state {
            if previous != index {
                info!("Discarding draft for word {} to edit word {}", previous, index);
            }
        }

        self.state = EditState::Editing {
            index,
            draft: token.word.clone(),
        };
        info!("Editing word {} ({:?})", index, token.word);
        Ok(())
    }

    /// Replace the draft text. Returns false when nothing is open.
    pub(crate) fn update_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            EditState::Idle => false,
        }
    }

    /// Write the draft into the transcript and close the session
    ///
    /// Returns the committed index, or `None` when nothing was open.
    pub(crate) fn commit(&mut self, store: &mut TranscriptStore) -> Option<usize> {
        let EditState::Editing { index, draft } = std::mem::take(&mut self.state) else {
            return None;
        };

        if store.replace_word(index, draft) {
            info!("Committed correction for word {}", index);
            Some(index)
        } else {
            None
        }
    }

    /// Close the session and discard the draft
    pub(crate) fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            EditState::Editing { index, .. } => {
                info!("Discarded draft for word {}", index);
                true
            }
            EditState::Idle => false,
        }
    }

    /// Close the session because of an interaction outside the editor
    pub(crate) fn dismiss(&mut self) -> bool {
        self.cancel()
    }
}

/// Rejected edit commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum EditError {
    #[error("Word index {index} is out of range (transcript has {len} words)")]
    IndexOutOfRange { index: usize, len: usize },
}
