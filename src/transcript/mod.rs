//! Transcript store
//!
//! Holds the ordered, time-aligned words being played back. Word corrections
//! replace the whole token sequence copy-on-write, so snapshots handed out
//! earlier never change underneath their readers.

pub(crate) mod resolver;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// One word and its position on the transcript timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Token {
    pub word: String,
    /// Start of the word in milliseconds
    pub start_time: u64,
    /// Length of the word in milliseconds
    pub duration: u64,
}

impl Token {
    #[cfg(test)]
    pub(crate) fn new(word: impl Into<String>, start_time: u64, duration: u64) -> Self {
        Self {
            word: word.into(),
            start_time,
            duration,
        }
    }

    /// Exclusive end of the word in milliseconds
    pub(crate) fn end_time(&self) -> u64 {
        self.start_time.saturating_add(self.duration)
    }

    /// Whether `elapsed_ms` falls in `[start_time, end_time)`
    pub(crate) fn contains(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.start_time && elapsed_ms < self.end_time()
    }
}

/// Immutable view of the transcript at one point in time
pub(crate) type TranscriptSnapshot = Arc<Vec<Arc<Token>>>;

/// Owner of the transcript for the lifetime of a player
#[derive(Debug, Clone)]
pub(crate) struct TranscriptStore {
    tokens: TranscriptSnapshot,
}

impl TranscriptStore {
    /// Create a store from already-parsed tokens
    ///
    /// Rejects an empty sequence: highlighting and end-of-playback are
    /// undefined without at least one token.
    pub(crate) fn new(tokens: Vec<Token>) -> Result<Self, TranscriptError> {
        if tokens.is_empty() {
            return Err(TranscriptError::Empty);
        }

        if tokens
            .windows(2)
            .any(|pair| pair[1].start_time < pair[0].start_time)
        {
            warn!("Transcript tokens are not ordered by start_time");
        }

        Ok(Self {
            tokens: Arc::new(tokens.into_iter().map(Arc::new).collect()),
        })
    }

    /// Parse a JSON array of `{word, start_time, duration}` records
    pub(crate) fn from_json_str(json: &str) -> Result<Self, TranscriptError> {
        let tokens: Vec<Token> = serde_json::from_str(json)?;
        Self::new(tokens)
    }

    /// Load a transcript from a JSON file
    pub(crate) fn load(path: &Path) -> Result<Self, TranscriptError> {
        let contents = fs::read_to_string(path).map_err(|e| TranscriptError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let store = Self::from_json_str(&contents)?;
        info!("Loaded {} words from {:?}", store.len(), path);
        Ok(store)
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index).map(|token| token.as_ref())
    }

    /// Current snapshot; cheap to clone and never mutated afterwards
    pub(crate) fn snapshot(&self) -> TranscriptSnapshot {
        Arc::clone(&self.tokens)
    }

    /// End of the final token, after which playback stops
    pub(crate) fn end_time(&self) -> u64 {
        self.tokens
            .last()
            .map(|token| token.end_time())
            .unwrap_or_default()
    }

    /// Replace the word at `index`, returning false when out of range
    ///
    /// Builds a new sequence in which every other token is the same
    /// allocation as before; only the replaced slot is new.
    pub(crate) fn replace_word(&mut self, index: usize, word: String) -> bool {
        let Some(current) = self.tokens.get(index) else {
            return false;
        };

        let replacement = Arc::new(Token {
            word,
            ..current.as_ref().clone()
        });

        let mut next: Vec<Arc<Token>> = self.tokens.iter().cloned().collect();
        next[index] = replacement;
        self.tokens = Arc::new(next);
        true
    }
}

/// Transcript loading errors
#[derive(Debug, thiserror::Error)]
pub(crate) enum TranscriptError {
    #[error("Transcript is empty")]
    Empty,

    #[error("Failed to read transcript {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
pub(crate) fn sample_store() -> TranscriptStore {
    TranscriptStore::new(vec![Token::new("hi", 0, 500), Token::new("there", 500, 500)])
        .expect("sample transcript is non-empty")
}
