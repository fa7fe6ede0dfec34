//! Error types for cadence-player
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Nothing here is fatal to the process: validation and
//! service failures surface as user-visible soft errors and the session
//! always lands in a well-defined state.

use thiserror::Error;

/// Main error type for cadence-player
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// External media search/playback service failures (recoverable)
    #[error("Media service error: {0}")]
    Media(String),

    /// Track rejected by the duration/live/keyword filter
    #[error("Track rejected: {0}")]
    Validation(String),

    /// Bad user input (index out of range, unknown mode string)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not valid in the current playback state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Search produced no results for a direct play request
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using cadence-player Error
pub type Result<T> = std::result::Result<T, Error>;
