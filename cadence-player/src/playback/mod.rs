//! Playback orchestration
//!
//! The engine owns all session transitions: user commands (play, skip,
//! queue edits) and media node signals (track start/end, voice state).
//! Each transition runs with the session's state mutex held end to end,
//! so two transitions for one session can never interleave.

pub mod autoplay;
pub mod engine;
pub mod idle;

pub use engine::PlaybackEngine;

use cadence_common::{LoopMode, PlaybackState, Track};
use serde::Serialize;

/// Result of a play command, for the API response
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PlayOutcome {
    /// Nothing was playing; the track started immediately
    Started { track: Track },
    /// Something was playing; the track joined the queue
    Queued { track: Track, position: usize },
    /// A playlist was resolved; invalid entries were skipped
    Playlist {
        name: String,
        queued: usize,
        skipped: usize,
        started: bool,
    },
}

/// Now-playing snapshot with a rendered progress bar
#[derive(Debug, Clone, Serialize)]
pub struct NowPlaying {
    pub track: Track,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub progress_bar: String,
    pub position_label: String,
    pub duration_label: String,
    pub state: PlaybackState,
    pub loop_mode: LoopMode,
    pub autoplay_enabled: bool,
    pub volume: u8,
}

/// Queue snapshot (full contents; pagination is the API layer's job)
#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub current: Option<Track>,
    pub tracks: Vec<Track>,
    pub total_duration_ms: u64,
    pub loop_mode: LoopMode,
    pub autoplay_enabled: bool,
}

/// Per-genre play count for the settings view
#[derive(Debug, Clone, Serialize)]
pub struct GenreStat {
    pub genre: String,
    pub plays: u32,
}

/// Session settings and taste summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionSettings {
    pub autoplay_enabled: bool,
    pub loop_mode: LoopMode,
    pub volume: u8,
    pub queue_len: usize,
    pub history_len: usize,
    pub genres: Vec<GenreStat>,
    pub listeners: u32,
    pub max_duration_secs: u64,
    pub idle_timeout_secs: u64,
}
