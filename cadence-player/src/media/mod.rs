//! Media node interface
//!
//! The orchestrator never touches audio itself. A separate media node
//! resolves search queries and plays tracks into the voice channel; this
//! module defines the client trait the playback engine drives, plus the
//! HTTP implementation used in production. Tests substitute a scripted
//! mock.

mod http;

pub use http::HttpMediaService;

use crate::error::Result;
use async_trait::async_trait;
use cadence_common::{SearchResult, SessionId, Track};

/// Client for the external search/playback node.
///
/// Every call is fallible; the playback engine treats failures as soft
/// (log and fall through) except where an operation's result decides the
/// next transition.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Resolve a query to tracks or a playlist
    async fn search(&self, query: &str) -> Result<SearchResult>;

    /// Begin playback of a track on a session's voice connection
    async fn play(&self, session_id: SessionId, track: &Track) -> Result<()>;

    /// Pause or resume the current track
    async fn pause(&self, session_id: SessionId, paused: bool) -> Result<()>;

    /// Stop the current track without disconnecting
    async fn stop(&self, session_id: SessionId) -> Result<()>;

    /// Set playback volume (0-100)
    async fn set_volume(&self, session_id: SessionId, volume: u8) -> Result<()>;

    /// Leave the voice channel
    async fn disconnect(&self, session_id: SessionId) -> Result<()>;

    /// Current playback position in milliseconds
    async fn position(&self, session_id: SessionId) -> Result<u64>;
}
