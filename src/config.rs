//! Application configuration
//!
//! Defaults are embedded from `config.toml` at build time. A user file at
//! `<config_dir>/transcript-player/config.toml` may replace either section.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::playback::ClockSettings;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml");

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Config {
    pub playback: PlaybackConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct PlaybackConfig {
    /// Logical milliseconds added per tick
    pub step_ms: u64,
    /// Real milliseconds between ticks
    pub period_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct LoggingConfig {
    pub log_ticks: bool,
}

/// Sections a user override file may provide
#[derive(Debug, Default, Deserialize)]
struct ConfigOverride {
    playback: Option<PlaybackConfig>,
    logging: Option<LoggingConfig>,
}

impl Config {
    /// Clock step and period for the playback clock
    pub(crate) fn clock_settings(&self) -> ClockSettings {
        ClockSettings {
            step_ms: self.playback.step_ms,
            period: Duration::from_millis(self.playback.period_ms),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.playback.step_ms == 0 || self.playback.period_ms == 0 {
            return Err(ConfigError::InvalidPlayback {
                step_ms: self.playback.step_ms,
                period_ms: self.playback.period_ms,
            });
        }
        Ok(self)
    }

    fn apply(mut self, overrides: ConfigOverride) -> Self {
        if let Some(playback) = overrides.playback {
            self.playback = playback;
        }
        if let Some(logging) = overrides.logging {
            self.logging = logging;
        }
        self
    }
}

/// Path of the optional per-user override file
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("transcript-player").join("config.toml"))
}

/// Parse the embedded defaults
fn default_config() -> Result<Config, ConfigError> {
    Ok(toml::from_str(DEFAULT_CONFIG_TOML)?)
}

/// Merge override TOML on top of the embedded defaults
fn config_with_override(override_toml: &str) -> Result<Config, ConfigError> {
    let overrides: ConfigOverride = toml::from_str(override_toml)?;
    default_config()?.apply(overrides).validate()
}

/// Load configuration: embedded defaults plus the user override, if any
pub(crate) fn load_config() -> Result<Config, ConfigError> {
    let Some(path) = user_config_path().filter(|p| p.exists()) else {
        return default_config()?.validate();
    };

    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;
    info!("Applying user configuration from {:?}", path);
    config_with_override(&contents)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Playback step and period must be positive (step_ms = {step_ms}, period_ms = {period_ms})")]
    InvalidPlayback { step_ms: u64, period_ms: u64 },
}
