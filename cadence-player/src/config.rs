//! cadence-player configuration
//!
//! Loaded from an optional TOML file; every field has a default so the
//! service runs with no config at all. Limits here bound the taste
//! model's memory and the track filter's acceptance rules.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Orchestrator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reject tracks longer than this (seconds). Default: 90 minutes.
    pub max_duration_secs: u64,

    /// Disconnect after this long with nothing playing (seconds)
    pub idle_timeout_secs: u64,

    /// Disconnect this long after the last listener leaves (seconds)
    pub alone_timeout_secs: u64,

    /// Taste model learns from the last N played tracks
    pub history_limit: usize,

    /// Anti-repeat ring buffer capacity (last N track ids)
    pub anti_repeat_limit: usize,

    /// Initial volume for new sessions (0-100)
    pub default_volume: u8,

    /// Character length of the now-playing progress bar
    pub progress_bar_length: usize,

    /// Case-insensitive title substrings that reject a track
    pub blocked_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_duration_secs: 90 * 60,
            idle_timeout_secs: 300,
            alone_timeout_secs: 30,
            history_limit: 10,
            anti_repeat_limit: 20,
            default_volume: 50,
            progress_bar_length: 15,
            blocked_keywords: [
                "shorts",
                "short",
                "#shorts",
                "mix",
                "compilation",
                "megamix",
                "full album",
                "album",
                "live",
                "concert",
                "trực tiếp",
                "loop",
                "1 hour",
                "10 hours",
                "8d",
                "8d audio",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no path given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("failed to read {}: {}", path.display(), e))
                })?;
                toml::from_str(&contents).map_err(|e| {
                    Error::Config(format!("failed to parse {}: {}", path.display(), e))
                })
            }
        }
    }

    /// Maximum track duration in milliseconds
    pub fn max_duration_ms(&self) -> u64 {
        self.max_duration_secs * 1000
    }
}
