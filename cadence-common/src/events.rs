//! Event types for the Cadence event system
//!
//! Events are broadcast on a per-process bus and serialized for SSE
//! transmission to whichever gateway renders user-visible notices.
//! All user-facing messaging in the orchestrator is expressed as one of
//! these events; the chat gateway decides how to display them.

use crate::track::{LoopMode, SessionId, Track};
use serde::{Deserialize, Serialize};

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Connected but nothing playing (idle timer may be pending)
    Idle,
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// What caused a queue mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum QueueChangeTrigger {
    Enqueue,
    Dequeue,
    Remove,
    Clear,
    Shuffle,
    Jump,
}

/// Cadence event types
///
/// Broadcast via the engine's event bus and streamed over SSE.
/// All events carry a session id and a UTC timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// A track started playing (natural advance, autoplay, or manual play)
    TrackStarted {
        session_id: SessionId,
        track: Track,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track was added to the queue by a user command
    TrackQueued {
        session_id: SessionId,
        track: Track,
        /// 1-based position in the queue
        position: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A playlist was enqueued; invalid entries were dropped
    PlaylistQueued {
        session_id: SessionId,
        name: String,
        queued: usize,
        skipped: usize,
        total_duration_ms: u64,
        /// True if the first entry started playing immediately
        started: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Prefetch notice: the queue is empty and this candidate will play
    /// next unless the user queues something first
    UpNext {
        session_id: SessionId,
        current: Track,
        next: Track,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Autoplay selected and started a track
    AutoplayStarted {
        session_id: SessionId,
        track: Track,
        /// True when the prefetched candidate was consumed,
        /// false when a fresh search ran
        from_prefetch: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Autoplay ran out of queries without finding a playable track
    AutoplayExhausted {
        session_id: SessionId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playing/paused/idle transition
    PlaybackStateChanged {
        session_id: SessionId,
        old_state: PlaybackState,
        new_state: PlaybackState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Queue contents changed
    QueueChanged {
        session_id: SessionId,
        queue_len: usize,
        trigger: QueueChangeTrigger,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Loop mode changed by user command
    LoopModeChanged {
        session_id: SessionId,
        mode: LoopMode,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Autoplay toggled by user command
    AutoplayModeChanged {
        session_id: SessionId,
        enabled: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Volume changed by user command (0-100)
    VolumeChanged {
        session_id: SessionId,
        volume: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session left the voice channel after idle timeout
    IdleDisconnected {
        session_id: SessionId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session left the voice channel because no listeners remained
    AloneDisconnected {
        session_id: SessionId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Event type string for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            PlayerEvent::TrackStarted { .. } => "TrackStarted",
            PlayerEvent::TrackQueued { .. } => "TrackQueued",
            PlayerEvent::PlaylistQueued { .. } => "PlaylistQueued",
            PlayerEvent::UpNext { .. } => "UpNext",
            PlayerEvent::AutoplayStarted { .. } => "AutoplayStarted",
            PlayerEvent::AutoplayExhausted { .. } => "AutoplayExhausted",
            PlayerEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            PlayerEvent::QueueChanged { .. } => "QueueChanged",
            PlayerEvent::LoopModeChanged { .. } => "LoopModeChanged",
            PlayerEvent::AutoplayModeChanged { .. } => "AutoplayModeChanged",
            PlayerEvent::VolumeChanged { .. } => "VolumeChanged",
            PlayerEvent::IdleDisconnected { .. } => "IdleDisconnected",
            PlayerEvent::AloneDisconnected { .. } => "AloneDisconnected",
        }
    }

    /// Session this event belongs to
    pub fn session_id(&self) -> SessionId {
        match self {
            PlayerEvent::TrackStarted { session_id, .. }
            | PlayerEvent::TrackQueued { session_id, .. }
            | PlayerEvent::PlaylistQueued { session_id, .. }
            | PlayerEvent::UpNext { session_id, .. }
            | PlayerEvent::AutoplayStarted { session_id, .. }
            | PlayerEvent::AutoplayExhausted { session_id, .. }
            | PlayerEvent::PlaybackStateChanged { session_id, .. }
            | PlayerEvent::QueueChanged { session_id, .. }
            | PlayerEvent::LoopModeChanged { session_id, .. }
            | PlayerEvent::AutoplayModeChanged { session_id, .. }
            | PlayerEvent::VolumeChanged { session_id, .. }
            | PlayerEvent::IdleDisconnected { session_id, .. }
            | PlayerEvent::AloneDisconnected { session_id, .. } => *session_id,
        }
    }
}
