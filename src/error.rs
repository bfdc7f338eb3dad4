use thiserror::Error;

use crate::config::ConfigError;
use crate::transcript::TranscriptError;

/// Application-level errors
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("No transcript given and none opened previously")]
    NoTranscript,
}
