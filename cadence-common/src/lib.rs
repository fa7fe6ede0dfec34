//! # Cadence Common Library
//!
//! Shared types for the Cadence voice-channel playback orchestrator.
//!
//! **Purpose:** Track model, playback signals, broadcast event definitions,
//! and human-readable time formatting shared between the orchestrator
//! service and anything that consumes its event stream.

pub mod events;
pub mod human_time;
pub mod track;

pub use events::{PlaybackState, PlayerEvent, QueueChangeTrigger};
pub use track::{LoopMode, SearchResult, SessionId, Track, TrackEndReason};
