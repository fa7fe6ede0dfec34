//! Track model and playback signal types
//!
//! Tracks are opaque handles returned by the external media search
//! service. They are immutable once resolved; the orchestrator only
//! inspects title/duration/liveness for filtering and scoring.

use serde::{Deserialize, Serialize};

/// Session identifier (one per active voice connection)
///
/// Keyed by the platform's guild id. Sessions are created on first
/// access and destroyed on stop/disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playable track as resolved by the media search service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique stable identifier from the media provider
    pub id: String,
    /// Display title
    pub title: String,
    /// Artist or uploading channel name
    pub author: String,
    /// Total duration in milliseconds (0 for live streams)
    pub duration_ms: u64,
    /// True if this is a live stream (unbounded duration)
    #[serde(default)]
    pub is_stream: bool,
    /// Optional artwork/thumbnail URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
}

/// Why a track stopped playing
///
/// Reported by the media node with every track-end signal. `Replaced`
/// means a manual play superseded the track; the state machine must not
/// run loop/queue/autoplay logic for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackEndReason {
    /// Track played to its natural end
    Finished,
    /// A manual play superseded this track
    Replaced,
    /// Forced stop or skip
    Stopped,
    /// The media node failed to load the track
    LoadFailed,
}

impl TrackEndReason {
    /// True for any end that should advance the state machine
    /// (everything except a manual replacement)
    pub fn is_actionable(&self) -> bool {
        !matches!(self, TrackEndReason::Replaced)
    }
}

impl std::fmt::Display for TrackEndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackEndReason::Finished => write!(f, "finished"),
            TrackEndReason::Replaced => write!(f, "replaced"),
            TrackEndReason::Stopped => write!(f, "stopped"),
            TrackEndReason::LoadFailed => write!(f, "loadFailed"),
        }
    }
}

/// Queue loop mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// No looping (default)
    #[default]
    Off,
    /// Replay the current track on natural finish
    Track,
    /// Re-append finished tracks to the queue tail
    Queue,
}

impl std::fmt::Display for LoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopMode::Off => write!(f, "off"),
            LoopMode::Track => write!(f, "track"),
            LoopMode::Queue => write!(f, "queue"),
        }
    }
}

impl std::str::FromStr for LoopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(LoopMode::Off),
            "track" => Ok(LoopMode::Track),
            "queue" => Ok(LoopMode::Queue),
            other => Err(format!(
                "invalid loop mode '{}', expected one of: off, track, queue",
                other
            )),
        }
    }
}

/// Result of a media search: either a flat hit list or a named playlist
///
/// Empty results are a valid, non-error outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchResult {
    Tracks { tracks: Vec<Track> },
    Playlist { name: String, tracks: Vec<Track> },
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResult::Tracks { tracks } => tracks.is_empty(),
            SearchResult::Playlist { tracks, .. } => tracks.is_empty(),
        }
    }

    /// Flatten into a track list, discarding any playlist name
    pub fn into_tracks(self) -> Vec<Track> {
        match self {
            SearchResult::Tracks { tracks } => tracks,
            SearchResult::Playlist { tracks, .. } => tracks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_mode_parse() {
        assert_eq!("off".parse::<LoopMode>().unwrap(), LoopMode::Off);
        assert_eq!("TRACK".parse::<LoopMode>().unwrap(), LoopMode::Track);
        assert_eq!("queue".parse::<LoopMode>().unwrap(), LoopMode::Queue);
        assert!("shuffle".parse::<LoopMode>().is_err());
    }

    #[test]
    fn test_end_reason_actionable() {
        assert!(TrackEndReason::Finished.is_actionable());
        assert!(TrackEndReason::Stopped.is_actionable());
        assert!(TrackEndReason::LoadFailed.is_actionable());
        assert!(!TrackEndReason::Replaced.is_actionable());
    }

    #[test]
    fn test_end_reason_wire_format() {
        let json = serde_json::to_string(&TrackEndReason::LoadFailed).unwrap();
        assert_eq!(json, "\"loadFailed\"");
        let parsed: TrackEndReason = serde_json::from_str("\"finished\"").unwrap();
        assert_eq!(parsed, TrackEndReason::Finished);
    }

    #[test]
    fn test_search_result_flatten() {
        let t = Track {
            id: "abc".into(),
            title: "Song".into(),
            author: "Artist".into(),
            duration_ms: 180_000,
            is_stream: false,
            artwork_url: None,
        };
        let result = SearchResult::Playlist {
            name: "Mix".into(),
            tracks: vec![t.clone()],
        };
        assert!(!result.is_empty());
        assert_eq!(result.into_tracks(), vec![t]);
    }
}
