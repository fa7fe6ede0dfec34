//! REST API for the playback orchestrator
//!
//! Two audiences share this surface: the chat gateway issues user
//! commands under `/sessions/{id}/...` and subscribes to `/events` for
//! notices, while the media node posts playback signals under
//! `/signals/...`.

pub mod handlers;
pub mod sse;

use crate::error::Error;
use crate::playback::PlaybackEngine;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<PlaybackEngine>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidState(_) => StatusCode::CONFLICT,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Media(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Http(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router
pub fn create_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // User commands
        .route("/sessions/:id/play", post(handlers::play))
        .route("/sessions/:id/skip", post(handlers::skip))
        .route("/sessions/:id/pause", post(handlers::pause))
        .route("/sessions/:id/resume", post(handlers::resume))
        .route("/sessions/:id/stop", post(handlers::stop))
        .route("/sessions/:id/queue", get(handlers::get_queue))
        .route("/sessions/:id/queue/clear", post(handlers::clear_queue))
        .route("/sessions/:id/queue/shuffle", post(handlers::shuffle_queue))
        .route("/sessions/:id/queue/jump", post(handlers::jump))
        .route("/sessions/:id/queue/:index", delete(handlers::remove_queued))
        .route("/sessions/:id/now-playing", get(handlers::now_playing))
        .route("/sessions/:id/loop", post(handlers::set_loop_mode))
        .route("/sessions/:id/autoplay", post(handlers::set_autoplay))
        .route("/sessions/:id/volume", post(handlers::set_volume))
        .route("/sessions/:id/settings", get(handlers::get_settings))
        // Media node signals
        .route("/signals/track-start", post(handlers::signal_track_start))
        .route("/signals/track-end", post(handlers::signal_track_end))
        .route("/signals/voice-state", post(handlers::signal_voice_state))
        // Event stream
        .route("/events", get(sse::event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
