//! HTTP request handlers

use crate::api::ApiContext;
use crate::error::Result;
use crate::playback::{NowPlaying, PlayOutcome, SessionSettings};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use cadence_common::human_time::format_duration;
use cadence_common::{LoopMode, SessionId, Track, TrackEndReason};
use serde::{Deserialize, Serialize};

/// Queue entries shown per page
const QUEUE_PAGE_SIZE: usize = 10;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    query: String,
}

#[derive(Debug, Serialize)]
pub struct SkipResponse {
    skipped: Track,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct QueuePageQuery {
    page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QueueEntry {
    /// 1-based queue position
    position: usize,
    track: Track,
    duration_label: String,
}

#[derive(Debug, Serialize)]
pub struct QueuePage {
    current: Option<Track>,
    entries: Vec<QueueEntry>,
    page: usize,
    pages: usize,
    total: usize,
    total_duration_ms: u64,
    total_duration_label: String,
    loop_mode: LoopMode,
    autoplay_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    removed: Track,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    dropped: usize,
}

#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    /// 1-based queue position
    position: usize,
}

#[derive(Debug, Serialize)]
pub struct JumpResponse {
    playing: Track,
}

#[derive(Debug, Deserialize)]
pub struct LoopRequest {
    mode: String,
}

#[derive(Debug, Serialize)]
pub struct LoopResponse {
    mode: LoopMode,
}

#[derive(Debug, Deserialize)]
pub struct AutoplayRequest {
    enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct AutoplayResponse {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    volume: u8,
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    volume: u8,
}

#[derive(Debug, Deserialize)]
pub struct TrackStartSignal {
    session_id: SessionId,
    track: Track,
}

#[derive(Debug, Deserialize)]
pub struct TrackEndSignal {
    session_id: SessionId,
    reason: TrackEndReason,
}

#[derive(Debug, Deserialize)]
pub struct VoiceStateSignal {
    session_id: SessionId,
    listeners: u32,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "cadence-player".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn play(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<PlayOutcome>> {
    let outcome = ctx.engine.play(SessionId(id), &req.query).await?;
    Ok(Json(outcome))
}

pub async fn skip(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<SkipResponse>> {
    let skipped = ctx.engine.skip(SessionId(id)).await?;
    Ok(Json(SkipResponse { skipped }))
}

pub async fn pause(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<StatusResponse>> {
    ctx.engine.pause(SessionId(id)).await?;
    Ok(Json(StatusResponse { status: "paused".to_string() }))
}

pub async fn resume(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<StatusResponse>> {
    ctx.engine.resume(SessionId(id)).await?;
    Ok(Json(StatusResponse { status: "playing".to_string() }))
}

pub async fn stop(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<StatusResponse>> {
    ctx.engine.stop(SessionId(id)).await?;
    Ok(Json(StatusResponse { status: "stopped".to_string() }))
}

pub async fn get_queue(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Query(query): Query<QueuePageQuery>,
) -> Result<Json<QueuePage>> {
    let snapshot = ctx.engine.queue_snapshot(SessionId(id)).await?;
    let total = snapshot.tracks.len();
    let pages = total.div_ceil(QUEUE_PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).clamp(1, pages);

    let entries = snapshot
        .tracks
        .iter()
        .enumerate()
        .skip((page - 1) * QUEUE_PAGE_SIZE)
        .take(QUEUE_PAGE_SIZE)
        .map(|(i, track)| QueueEntry {
            position: i + 1,
            duration_label: format_duration(track.duration_ms),
            track: track.clone(),
        })
        .collect();

    Ok(Json(QueuePage {
        current: snapshot.current,
        entries,
        page,
        pages,
        total,
        total_duration_ms: snapshot.total_duration_ms,
        total_duration_label: format_duration(snapshot.total_duration_ms),
        loop_mode: snapshot.loop_mode,
        autoplay_enabled: snapshot.autoplay_enabled,
    }))
}

pub async fn remove_queued(
    State(ctx): State<ApiContext>,
    Path((id, index)): Path<(u64, usize)>,
) -> Result<Json<RemoveResponse>> {
    let removed = ctx.engine.remove_at(SessionId(id), index).await?;
    Ok(Json(RemoveResponse { removed }))
}

pub async fn clear_queue(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<ClearResponse>> {
    let dropped = ctx.engine.clear_queue(SessionId(id)).await?;
    Ok(Json(ClearResponse { dropped }))
}

pub async fn shuffle_queue(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<StatusResponse>> {
    ctx.engine.shuffle_queue(SessionId(id)).await?;
    Ok(Json(StatusResponse { status: "shuffled".to_string() }))
}

pub async fn jump(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<JumpResponse>> {
    let playing = ctx.engine.jump_to(SessionId(id), req.position).await?;
    Ok(Json(JumpResponse { playing }))
}

pub async fn now_playing(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<NowPlaying>> {
    let snapshot = ctx.engine.now_playing(SessionId(id)).await?;
    Ok(Json(snapshot))
}

pub async fn set_loop_mode(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Json(req): Json<LoopRequest>,
) -> Result<Json<LoopResponse>> {
    let mode: LoopMode = req
        .mode
        .parse()
        .map_err(crate::error::Error::InvalidInput)?;
    let mode = ctx.engine.set_loop_mode(SessionId(id), mode).await?;
    Ok(Json(LoopResponse { mode }))
}

pub async fn set_autoplay(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Json(req): Json<AutoplayRequest>,
) -> Result<Json<AutoplayResponse>> {
    let enabled = ctx.engine.set_autoplay(SessionId(id), req.enabled).await?;
    Ok(Json(AutoplayResponse { enabled }))
}

pub async fn set_volume(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Json(req): Json<VolumeRequest>,
) -> Result<Json<VolumeResponse>> {
    let volume = ctx.engine.set_volume(SessionId(id), req.volume).await?;
    Ok(Json(VolumeResponse { volume }))
}

pub async fn get_settings(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<SessionSettings>> {
    let settings = ctx.engine.settings(SessionId(id)).await?;
    Ok(Json(settings))
}

// ============================================================================
// Media node signals
// ============================================================================

pub async fn signal_track_start(
    State(ctx): State<ApiContext>,
    Json(signal): Json<TrackStartSignal>,
) -> StatusCode {
    ctx.engine
        .handle_track_started(signal.session_id, signal.track)
        .await;
    StatusCode::NO_CONTENT
}

pub async fn signal_track_end(
    State(ctx): State<ApiContext>,
    Json(signal): Json<TrackEndSignal>,
) -> StatusCode {
    ctx.engine
        .handle_track_ended(signal.session_id, signal.reason)
        .await;
    StatusCode::NO_CONTENT
}

pub async fn signal_voice_state(
    State(ctx): State<ApiContext>,
    Json(signal): Json<VoiceStateSignal>,
) -> StatusCode {
    ctx.engine
        .handle_voice_state(signal.session_id, signal.listeners)
        .await;
    StatusCode::NO_CONTENT
}
