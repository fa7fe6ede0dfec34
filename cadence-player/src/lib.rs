//! Cadence Player - voice channel playback orchestrator
//!
//! Tracks what each voice session is doing (current track, queue, loop
//! and autoplay modes), decides what plays next when a track ends, and
//! learns a per-session taste profile to drive genre-based autoplay.
//! Audio itself is handled by a separate media node; user commands come
//! from the chat gateway over the REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod media;
pub mod playback;
pub mod session;
pub mod taste;

pub use config::Config;
pub use error::{Error, Result};
pub use playback::PlaybackEngine;
