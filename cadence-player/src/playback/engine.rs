//! Playback engine
//!
//! Entry point for every session transition. User commands arrive from
//! the HTTP API; playback signals arrive from the media node. Both
//! funnel through here, take the session lock, mutate state, drive the
//! media node, and broadcast events for the gateway to render.
//!
//! Media failures during advancement are soft: the engine logs them and
//! keeps trying the next source (rest of the queue, then autoplay), so a
//! dead track never wedges a session.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::TrackFilter;
use crate::media::MediaService;
use crate::playback::{
    autoplay, idle, GenreStat, NowPlaying, PlayOutcome, QueueSnapshot, SessionSettings,
};
use crate::session::{SessionRegistry, SessionState};
use cadence_common::human_time::{format_duration, progress_bar};
use cadence_common::{
    LoopMode, PlaybackState, PlayerEvent, QueueChangeTrigger, SearchResult, SessionId, Track,
    TrackEndReason,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub struct PlaybackEngine {
    pub(crate) sessions: Arc<SessionRegistry>,
    pub(crate) media: Arc<dyn MediaService>,
    pub(crate) filter: TrackFilter,
    pub(crate) config: Config,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlaybackEngine {
    pub fn new(config: Config, media: Arc<dyn MediaService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            sessions: Arc::new(SessionRegistry::new(config.clone())),
            filter: TrackFilter::new(&config),
            config,
            media,
            events,
        })
    }

    /// Subscribe to the event bus (SSE clients, tests)
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: PlayerEvent) {
        debug!(event = event.event_type(), session_id = event.session_id().0, "event");
        // Send fails only when no subscriber is connected; that is fine
        let _ = self.events.send(event);
    }

    fn set_playback(&self, state: &mut SessionState, session_id: SessionId, new: PlaybackState) {
        if state.playback != new {
            let old = state.playback;
            state.playback = new;
            self.emit(PlayerEvent::PlaybackStateChanged {
                session_id,
                old_state: old,
                new_state: new,
                timestamp: Utc::now(),
            });
        }
    }

    fn emit_queue_changed(
        &self,
        state: &SessionState,
        session_id: SessionId,
        trigger: QueueChangeTrigger,
    ) {
        self.emit(PlayerEvent::QueueChanged {
            session_id,
            queue_len: state.queue.len(),
            trigger,
            timestamp: Utc::now(),
        });
    }

    async fn existing_session(&self, session_id: SessionId) -> Result<Arc<crate::session::Session>> {
        self.sessions
            .get(session_id)
            .await
            .ok_or_else(|| Error::NotFound(format!("no active session {}", session_id.0)))
    }

    // ------------------------------------------------------------------
    // User commands
    // ------------------------------------------------------------------

    /// Resolve a query and either start it or queue it.
    ///
    /// Playlists enqueue every playable entry; single results enqueue
    /// the first track. Queuing anything invalidates a prefetched
    /// autoplay candidate, since the user's choice takes precedence.
    pub async fn play(self: &Arc<Self>, session_id: SessionId, query: &str) -> Result<PlayOutcome> {
        let result = self.media.search(query).await?;
        if result.is_empty() {
            return Err(Error::NotFound(format!("no results for '{}'", query)));
        }

        let session = self.sessions.get_or_create(session_id).await;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;

        match result {
            SearchResult::Playlist { name, tracks } => {
                self.enqueue_playlist(state, session_id, name, tracks).await
            }
            SearchResult::Tracks { tracks } => {
                let track = tracks
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::NotFound(format!("no results for '{}'", query)))?;
                self.filter
                    .validate_track(&track)
                    .map_err(|r| Error::Validation(r.to_string()))?;

                if state.current.is_some() {
                    state.queue.push_back(track.clone());
                    state.pending_autoplay = None;
                    let position = state.queue.len();
                    self.emit(PlayerEvent::TrackQueued {
                        session_id,
                        track: track.clone(),
                        position,
                        timestamp: Utc::now(),
                    });
                    self.emit_queue_changed(state, session_id, QueueChangeTrigger::Enqueue);
                    Ok(PlayOutcome::Queued { track, position })
                } else {
                    self.start_track(state, session_id, track.clone()).await?;
                    Ok(PlayOutcome::Started { track })
                }
            }
        }
    }

    async fn enqueue_playlist(
        self: &Arc<Self>,
        state: &mut SessionState,
        session_id: SessionId,
        name: String,
        tracks: Vec<Track>,
    ) -> Result<PlayOutcome> {
        let total = tracks.len();
        let valid: Vec<Track> = tracks
            .into_iter()
            .filter(|t| self.filter.validate_track(t).is_ok())
            .collect();
        let skipped = total - valid.len();
        if valid.is_empty() {
            return Err(Error::Validation(format!(
                "no playable tracks in playlist '{}'",
                name
            )));
        }
        let total_duration_ms: u64 = valid.iter().map(|t| t.duration_ms).sum();

        let mut iter = valid.into_iter();
        let mut started = false;
        if state.current.is_none() {
            if let Some(first) = iter.next() {
                self.start_track(state, session_id, first).await?;
                started = true;
            }
        }

        let mut queued = 0;
        for track in iter {
            state.queue.push_back(track);
            queued += 1;
        }
        if queued > 0 {
            state.pending_autoplay = None;
            self.emit_queue_changed(state, session_id, QueueChangeTrigger::Enqueue);
        }

        info!(
            session_id = session_id.0,
            playlist = %name,
            queued, skipped, started,
            "playlist enqueued"
        );
        self.emit(PlayerEvent::PlaylistQueued {
            session_id,
            name: name.clone(),
            queued,
            skipped,
            total_duration_ms,
            started,
            timestamp: Utc::now(),
        });
        Ok(PlayOutcome::Playlist {
            name,
            queued,
            skipped,
            started,
        })
    }

    /// Start a track on the media node, then commit it as current.
    /// Ordering matters: on failure the session state is untouched.
    async fn start_track(
        &self,
        state: &mut SessionState,
        session_id: SessionId,
        track: Track,
    ) -> Result<()> {
        state.cancel_idle_timer();
        self.media.play(session_id, &track).await?;
        info!(session_id = session_id.0, title = %track.title, "track starting");
        state.current = Some(track);
        self.set_playback(state, session_id, PlaybackState::Playing);
        Ok(())
    }

    /// Stop the current track. Advancement happens when the media node
    /// reports the track end.
    pub async fn skip(&self, session_id: SessionId) -> Result<Track> {
        let session = self.existing_session(session_id).await?;
        let state = session.state.lock().await;
        let current = state
            .current
            .clone()
            .ok_or_else(|| Error::InvalidState("nothing is playing".into()))?;
        self.media.stop(session_id).await?;
        Ok(current)
    }

    pub async fn pause(&self, session_id: SessionId) -> Result<()> {
        let session = self.existing_session(session_id).await?;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        if state.playback != PlaybackState::Playing {
            return Err(Error::InvalidState(format!(
                "cannot pause while {}",
                state.playback
            )));
        }
        self.media.pause(session_id, true).await?;
        self.set_playback(state, session_id, PlaybackState::Paused);
        Ok(())
    }

    pub async fn resume(&self, session_id: SessionId) -> Result<()> {
        let session = self.existing_session(session_id).await?;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        if state.playback != PlaybackState::Paused {
            return Err(Error::InvalidState(format!(
                "cannot resume while {}",
                state.playback
            )));
        }
        self.media.pause(session_id, false).await?;
        self.set_playback(state, session_id, PlaybackState::Playing);
        Ok(())
    }

    /// Stop playback and tear the session down: queue, taste history,
    /// and timers all go, and the voice connection closes.
    pub async fn stop(&self, session_id: SessionId) -> Result<()> {
        let session = self.existing_session(session_id).await?;
        {
            let mut guard = session.state.lock().await;
            let state = &mut *guard;
            if let Err(e) = self.media.stop(session_id).await {
                warn!(session_id = session_id.0, error = %e, "media stop failed");
            }
            let old = state.playback;
            state.reset();
            if old != PlaybackState::Idle {
                self.emit(PlayerEvent::PlaybackStateChanged {
                    session_id,
                    old_state: old,
                    new_state: PlaybackState::Idle,
                    timestamp: Utc::now(),
                });
            }
            self.emit_queue_changed(state, session_id, QueueChangeTrigger::Clear);
        }
        if let Err(e) = self.media.disconnect(session_id).await {
            warn!(session_id = session_id.0, error = %e, "disconnect failed");
        }
        self.sessions.remove(session_id).await;
        info!(session_id = session_id.0, "session stopped and torn down");
        Ok(())
    }

    pub async fn queue_snapshot(&self, session_id: SessionId) -> Result<QueueSnapshot> {
        let session = self.existing_session(session_id).await?;
        let state = session.state.lock().await;
        Ok(QueueSnapshot {
            current: state.current.clone(),
            tracks: state.queue.iter().cloned().collect(),
            total_duration_ms: state.queue.iter().map(|t| t.duration_ms).sum(),
            loop_mode: state.loop_mode,
            autoplay_enabled: state.autoplay_enabled,
        })
    }

    /// Remove the queue entry at a 1-based position
    pub async fn remove_at(&self, session_id: SessionId, index: usize) -> Result<Track> {
        let session = self.existing_session(session_id).await?;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        let len = state.queue.len();
        if index == 0 || index > len {
            return Err(Error::InvalidInput(format!(
                "position {} out of range 1..={}",
                index, len
            )));
        }
        let track = state
            .queue
            .remove(index - 1)
            .ok_or_else(|| Error::Internal("queue index vanished".into()))?;
        self.emit_queue_changed(state, session_id, QueueChangeTrigger::Remove);
        Ok(track)
    }

    pub async fn clear_queue(&self, session_id: SessionId) -> Result<usize> {
        let session = self.existing_session(session_id).await?;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        if state.queue.is_empty() {
            return Err(Error::InvalidState("queue is already empty".into()));
        }
        let dropped = state.queue.len();
        state.queue.clear();
        self.emit_queue_changed(state, session_id, QueueChangeTrigger::Clear);
        Ok(dropped)
    }

    pub async fn shuffle_queue(&self, session_id: SessionId) -> Result<()> {
        let session = self.existing_session(session_id).await?;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        if state.queue.len() < 2 {
            return Err(Error::InvalidState(
                "need at least 2 queued tracks to shuffle".into(),
            ));
        }
        state.queue.make_contiguous().shuffle(&mut state.rng);
        self.emit_queue_changed(state, session_id, QueueChangeTrigger::Shuffle);
        Ok(())
    }

    /// Jump to a 1-based queue position, dropping everything before it
    pub async fn jump_to(self: &Arc<Self>, session_id: SessionId, index: usize) -> Result<Track> {
        let session = self.existing_session(session_id).await?;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        let len = state.queue.len();
        if index == 0 || index > len {
            return Err(Error::InvalidInput(format!(
                "position {} out of range 1..={}",
                index, len
            )));
        }
        state.queue.drain(..index - 1);
        let target = state
            .queue
            .pop_front()
            .ok_or_else(|| Error::Internal("queue index vanished".into()))?;
        state.pending_autoplay = None;
        self.start_track(state, session_id, target.clone()).await?;
        self.emit_queue_changed(state, session_id, QueueChangeTrigger::Jump);
        Ok(target)
    }

    pub async fn now_playing(&self, session_id: SessionId) -> Result<NowPlaying> {
        let session = self.existing_session(session_id).await?;
        let state = session.state.lock().await;
        let track = state
            .current
            .clone()
            .ok_or_else(|| Error::InvalidState("nothing is playing".into()))?;
        // Position is best-effort; an unreachable media node reads as 0:00
        let position_ms = match self.media.position(session_id).await {
            Ok(position) => position,
            Err(e) => {
                debug!(session_id = session_id.0, error = %e, "position unavailable");
                0
            }
        };
        Ok(NowPlaying {
            position_ms,
            duration_ms: track.duration_ms,
            progress_bar: progress_bar(
                position_ms,
                track.duration_ms,
                self.config.progress_bar_length,
            ),
            position_label: format_duration(position_ms),
            duration_label: format_duration(track.duration_ms),
            state: state.playback,
            loop_mode: state.loop_mode,
            autoplay_enabled: state.autoplay_enabled,
            volume: state.volume,
            track,
        })
    }

    pub async fn set_loop_mode(&self, session_id: SessionId, mode: LoopMode) -> Result<LoopMode> {
        let session = self.sessions.get_or_create(session_id).await;
        let mut state = session.state.lock().await;
        state.loop_mode = mode;
        self.emit(PlayerEvent::LoopModeChanged {
            session_id,
            mode,
            timestamp: Utc::now(),
        });
        Ok(mode)
    }

    pub async fn set_autoplay(&self, session_id: SessionId, enabled: bool) -> Result<bool> {
        let session = self.sessions.get_or_create(session_id).await;
        let mut state = session.state.lock().await;
        state.autoplay_enabled = enabled;
        if !enabled {
            state.pending_autoplay = None;
        }
        self.emit(PlayerEvent::AutoplayModeChanged {
            session_id,
            enabled,
            timestamp: Utc::now(),
        });
        Ok(enabled)
    }

    pub async fn set_volume(&self, session_id: SessionId, volume: u8) -> Result<u8> {
        let volume = volume.min(100);
        let session = self.sessions.get_or_create(session_id).await;
        let mut state = session.state.lock().await;
        self.media.set_volume(session_id, volume).await?;
        state.volume = volume;
        self.emit(PlayerEvent::VolumeChanged {
            session_id,
            volume,
            timestamp: Utc::now(),
        });
        Ok(volume)
    }

    /// Settings are readable for any session id; a fresh session simply
    /// reports the defaults.
    pub async fn settings(&self, session_id: SessionId) -> Result<SessionSettings> {
        let session = self.sessions.get_or_create(session_id).await;
        let state = session.state.lock().await;
        Ok(SessionSettings {
            autoplay_enabled: state.autoplay_enabled,
            loop_mode: state.loop_mode,
            volume: state.volume,
            queue_len: state.queue.len(),
            history_len: state.taste.history_len(),
            genres: state
                .taste
                .genre_stats()
                .into_iter()
                .map(|(genre, plays)| GenreStat {
                    genre: genre.to_string(),
                    plays,
                })
                .collect(),
            listeners: state.listeners,
            max_duration_secs: self.config.max_duration_secs,
            idle_timeout_secs: self.config.idle_timeout_secs,
        })
    }

    // ------------------------------------------------------------------
    // Media node signals
    // ------------------------------------------------------------------

    /// A track actually started on the media node. Authoritative: sets
    /// current, learns taste, and prefetches an autoplay candidate when
    /// the queue is empty.
    pub async fn handle_track_started(self: &Arc<Self>, session_id: SessionId, track: Track) {
        let session = self.sessions.get_or_create(session_id).await;
        let mut guard = session.state.lock().await;
        let state = &mut *guard;

        state.cancel_idle_timer();
        state.current = Some(track.clone());
        self.set_playback(state, session_id, PlaybackState::Playing);
        state.taste.learn(&track);
        self.emit(PlayerEvent::TrackStarted {
            session_id,
            track: track.clone(),
            timestamp: Utc::now(),
        });

        if state.queue.is_empty() && state.autoplay_enabled && state.pending_autoplay.is_none() {
            if let Some(next) = autoplay::select_candidate(self, state, &track).await {
                state.pending_autoplay = Some(next.clone());
                self.emit(PlayerEvent::UpNext {
                    session_id,
                    current: track,
                    next,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// A track ended on the media node. Decides what plays next: loop
    /// mode, then the queue, then autoplay, then the idle timer.
    pub async fn handle_track_ended(
        self: &Arc<Self>,
        session_id: SessionId,
        reason: TrackEndReason,
    ) {
        let Some(session) = self.sessions.get(session_id).await else {
            debug!(session_id = session_id.0, "track end for unknown session");
            return;
        };
        let mut guard = session.state.lock().await;
        let state = &mut *guard;

        if !reason.is_actionable() {
            debug!(session_id = session_id.0, %reason, "track replaced, no advance");
            return;
        }
        let Some(ended) = state.current.take() else {
            debug!(session_id = session_id.0, "track end with no current track");
            return;
        };

        if reason == TrackEndReason::Finished {
            match state.loop_mode {
                LoopMode::Track => match self.media.play(session_id, &ended).await {
                    Ok(()) => {
                        state.current = Some(ended);
                        return;
                    }
                    Err(e) => {
                        warn!(session_id = session_id.0, error = %e, "loop replay failed, advancing");
                    }
                },
                LoopMode::Queue => {
                    state.queue.push_back(ended.clone());
                    self.emit_queue_changed(state, session_id, QueueChangeTrigger::Enqueue);
                }
                LoopMode::Off => {}
            }
        }

        self.advance(state, session_id, &ended).await;
    }

    /// Pick the next source after a track ends: queue first, then the
    /// prefetched autoplay candidate, then a fresh autoplay search, and
    /// finally the idle timer when everything comes up empty.
    async fn advance(self: &Arc<Self>, state: &mut SessionState, session_id: SessionId, seed: &Track) {
        while let Some(next) = state.queue.pop_front() {
            self.emit_queue_changed(state, session_id, QueueChangeTrigger::Dequeue);
            match self.media.play(session_id, &next).await {
                Ok(()) => {
                    state.current = Some(next);
                    self.set_playback(state, session_id, PlaybackState::Playing);
                    return;
                }
                Err(e) => {
                    warn!(session_id = session_id.0, title = %next.title, error = %e,
                        "queued track failed to start, trying next");
                }
            }
        }

        if state.autoplay_enabled {
            if let Some(pending) = state.pending_autoplay.take() {
                match self.media.play(session_id, &pending).await {
                    Ok(()) => {
                        state.current = Some(pending.clone());
                        self.set_playback(state, session_id, PlaybackState::Playing);
                        self.emit(PlayerEvent::AutoplayStarted {
                            session_id,
                            track: pending,
                            from_prefetch: true,
                            timestamp: Utc::now(),
                        });
                        return;
                    }
                    Err(e) => {
                        warn!(session_id = session_id.0, error = %e,
                            "prefetched autoplay track failed, searching fresh");
                    }
                }
            }

            if let Some(track) = autoplay::select_candidate(self, state, seed).await {
                match self.media.play(session_id, &track).await {
                    Ok(()) => {
                        state.current = Some(track.clone());
                        self.set_playback(state, session_id, PlaybackState::Playing);
                        self.emit(PlayerEvent::AutoplayStarted {
                            session_id,
                            track,
                            from_prefetch: false,
                            timestamp: Utc::now(),
                        });
                        return;
                    }
                    Err(e) => {
                        warn!(session_id = session_id.0, error = %e, "autoplay track failed to start");
                    }
                }
            }

            self.emit(PlayerEvent::AutoplayExhausted {
                session_id,
                timestamp: Utc::now(),
            });
        }

        self.set_playback(state, session_id, PlaybackState::Idle);
        idle::arm_idle_timer(self, state, session_id);
    }

    /// Listener count changed in the voice channel
    pub async fn handle_voice_state(self: &Arc<Self>, session_id: SessionId, listeners: u32) {
        let Some(session) = self.sessions.get(session_id).await else {
            return;
        };
        let mut guard = session.state.lock().await;
        let state = &mut *guard;
        state.listeners = listeners;
        if listeners == 0 {
            debug!(session_id = session_id.0, "voice channel empty, arming alone timer");
            idle::arm_alone_timer(self, state, session_id);
        } else {
            state.cancel_alone_timer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::mock::{MediaCall, MockMediaService};

    fn track(id: &str, title: &str) -> Track {
        Track {
            id: id.into(),
            title: title.into(),
            author: "Artist".into(),
            duration_ms: 200_000,
            is_stream: false,
            artwork_url: None,
        }
    }

    fn test_engine() -> (Arc<PlaybackEngine>, Arc<MockMediaService>) {
        let media = Arc::new(MockMediaService::new());
        let media_service: Arc<dyn MediaService> = media.clone();
        let engine = PlaybackEngine::new(Config::default(), media_service);
        (engine, media)
    }

    fn drain_events(rx: &mut broadcast::Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    const SID: SessionId = SessionId(1);

    #[tokio::test]
    async fn test_play_starts_when_idle() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);

        let outcome = engine.play(SID, "song").await.unwrap();
        assert!(matches!(outcome, PlayOutcome::Started { ref track } if track.id == "t1"));
        assert_eq!(media.played_ids(), vec!["t1"]);

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.playback, PlaybackState::Playing);
        assert_eq!(state.current.as_ref().unwrap().id, "t1");
    }

    #[tokio::test]
    async fn test_play_queues_when_busy_and_invalidates_prefetch() {
        let (engine, media) = test_engine();
        media.script_tracks("first", vec![track("t1", "Song One")]);
        media.script_tracks("second", vec![track("t2", "Song Two")]);

        engine.play(SID, "first").await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            session.state.lock().await.pending_autoplay = Some(track("p1", "Prefetched"));
        }

        let outcome = engine.play(SID, "second").await.unwrap();
        assert!(matches!(outcome, PlayOutcome::Queued { position: 1, .. }));

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.queue.len(), 1);
        // User choice displaces the prefetched candidate
        assert!(state.pending_autoplay.is_none());
        // The queued track did not start
        assert_eq!(media.played_ids(), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_play_rejects_filtered_track() {
        let (engine, media) = test_engine();
        let mut stream = track("t1", "Radio");
        stream.is_stream = true;
        media.script_tracks("radio", vec![stream]);

        let err = engine.play(SID, "radio").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(media.played_ids().is_empty());
    }

    #[tokio::test]
    async fn test_play_no_results() {
        let (engine, _media) = test_engine();
        let err = engine.play(SID, "nothing scripted").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_playlist_starts_first_and_queues_rest() {
        let (engine, media) = test_engine();
        let mut too_long = track("bad", "Marathon");
        too_long.duration_ms = 10_000_000;
        media.script_search(
            "pl",
            SearchResult::Playlist {
                name: "Mixtape".into(),
                tracks: vec![track("t1", "One"), too_long, track("t2", "Two")],
            },
        );

        let outcome = engine.play(SID, "pl").await.unwrap();
        match outcome {
            PlayOutcome::Playlist { queued, skipped, started, .. } => {
                assert_eq!(queued, 1);
                assert_eq!(skipped, 1);
                assert!(started);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(media.played_ids(), vec!["t1"]);

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.queue[0].id, "t2");
    }

    #[tokio::test]
    async fn test_replaced_track_end_is_a_no_op() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            session.state.lock().await.queue.push_back(track("t2", "Next"));
        }

        engine.handle_track_ended(SID, TrackEndReason::Replaced).await;

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        // Nothing advanced: current and queue untouched
        assert_eq!(state.current.as_ref().unwrap().id, "t1");
        assert_eq!(state.queue.len(), 1);
        assert_eq!(media.played_ids(), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_loop_track_replays_and_leaves_queue_untouched() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        engine.set_loop_mode(SID, LoopMode::Track).await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            let mut state = session.state.lock().await;
            state.queue.push_back(track("t2", "Next"));
            state.queue.push_back(track("t3", "Later"));
        }

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        assert_eq!(media.played_ids(), vec!["t1", "t1"]);
        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.current.as_ref().unwrap().id, "t1");
        // Queue untouched by the replay
        assert_eq!(state.queue.len(), 2);
    }

    #[tokio::test]
    async fn test_loop_track_does_not_replay_on_manual_stop() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        engine.set_loop_mode(SID, LoopMode::Track).await.unwrap();
        engine.set_autoplay(SID, false).await.unwrap();

        engine.handle_track_ended(SID, TrackEndReason::Stopped).await;

        // Skip overrides the loop: no replay, session goes idle
        assert_eq!(media.played_ids(), vec!["t1"]);
        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.playback, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_loop_queue_keeps_all_tracks_in_rotation() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        engine.set_loop_mode(SID, LoopMode::Queue).await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            session.state.lock().await.queue.push_back(track("t2", "Next"));
        }

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        // t1 rotated to the back, t2 now playing: still 2 tracks total
        assert_eq!(state.current.as_ref().unwrap().id, "t2");
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.queue[0].id, "t1");
    }

    #[tokio::test]
    async fn test_queue_advance_skips_unplayable_tracks() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        media.fail_play_for("t2");
        {
            let session = engine.sessions.get(SID).await.unwrap();
            let mut state = session.state.lock().await;
            state.queue.push_back(track("t2", "Broken"));
            state.queue.push_back(track("t3", "Works"));
        }

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.current.as_ref().unwrap().id, "t3");
        assert!(state.queue.is_empty());
        assert_eq!(media.played_ids(), vec!["t1", "t2", "t3"]);
    }

    #[tokio::test]
    async fn test_autoplay_consumes_prefetched_candidate() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            session.state.lock().await.pending_autoplay = Some(track("p1", "Prefetched"));
        }
        let mut rx = engine.subscribe_events();

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        assert_eq!(media.played_ids(), vec!["t1", "p1"]);
        let events = drain_events(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            PlayerEvent::AutoplayStarted { from_prefetch: true, track, .. } if track.id == "p1"
        )));
        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert!(state.pending_autoplay.is_none());
        assert_eq!(state.current.as_ref().unwrap().id, "p1");
    }

    #[tokio::test]
    async fn test_autoplay_fresh_search_when_no_prefetch() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        // First autoplay query is "<cleaned title> <author>"
        media.script_tracks("Song Artist", vec![track("a1", "Similar Song")]);
        let mut rx = engine.subscribe_events();

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        assert_eq!(media.played_ids(), vec!["t1", "a1"]);
        let events = drain_events(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            PlayerEvent::AutoplayStarted { from_prefetch: false, .. }
        )));
    }

    #[tokio::test]
    async fn test_autoplay_tries_dash_split_artist_first() {
        let (engine, media) = test_engine();
        let seed = Track {
            id: "t1".into(),
            title: "Artist - Song".into(),
            author: "Channel".into(),
            duration_ms: 200_000,
            is_stream: false,
            artwork_url: None,
        };
        media.script_tracks("song", vec![seed]);
        engine.play(SID, "song").await.unwrap();
        media.script_tracks("Artist", vec![track("a1", "Artist - Other Song")]);

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        let searches: Vec<String> = media
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                MediaCall::Search(q) => Some(q),
                _ => None,
            })
            .collect();
        // After the user query, the artist from the title leads the list
        assert_eq!(searches[1], "Artist");
        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.current.as_ref().unwrap().id, "a1");
    }

    #[tokio::test]
    async fn test_settings_default_for_fresh_session() {
        let (engine, _media) = test_engine();
        let settings = engine.settings(SessionId(99)).await.unwrap();
        assert!(settings.autoplay_enabled);
        assert_eq!(settings.loop_mode, LoopMode::Off);
        assert_eq!(settings.volume, 50);
        assert_eq!(settings.queue_len, 0);
        assert_eq!(settings.history_len, 0);
    }

    #[tokio::test]
    async fn test_autoplay_skips_recently_played() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        // t1 is in the anti-repeat ring after it started; only a2 is eligible
        engine.handle_track_started(SID, track("t1", "Song")).await;
        media.script_tracks("Song Artist", vec![track("t1", "Song"), track("a2", "Other")]);

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.current.as_ref().unwrap().id, "a2");
    }

    #[tokio::test]
    async fn test_autoplay_exhausted_emits_once_and_goes_idle() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        let mut rx = engine.subscribe_events();

        // No autoplay queries scripted: every search returns empty
        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        let events = drain_events(&mut rx);
        let exhausted = events
            .iter()
            .filter(|e| matches!(e, PlayerEvent::AutoplayExhausted { .. }))
            .count();
        assert_eq!(exhausted, 1);

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.playback, PlaybackState::Idle);
        assert!(state.idle_timer.is_some());
    }

    #[tokio::test]
    async fn test_no_autoplay_when_disabled() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        engine.set_autoplay(SID, false).await.unwrap();
        let mut rx = engine.subscribe_events();

        engine.handle_track_ended(SID, TrackEndReason::Finished).await;

        let events = drain_events(&mut rx);
        assert!(!events
            .iter()
            .any(|e| matches!(e, PlayerEvent::AutoplayExhausted { .. })));
        // No autoplay searches ran
        assert!(!media
            .calls()
            .iter()
            .any(|c| matches!(c, MediaCall::Search(q) if q != "song")));

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.playback, PlaybackState::Idle);
        assert!(state.idle_timer.is_some());
    }

    #[tokio::test]
    async fn test_track_started_learns_and_prefetches() {
        let (engine, media) = test_engine();
        media.script_tracks("lofi beats Artist", vec![track("p1", "lofi rain")]);
        let mut rx = engine.subscribe_events();

        engine.handle_track_started(SID, track("t1", "lofi beats")).await;

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.taste.history_len(), 1);
        assert_eq!(state.pending_autoplay.as_ref().unwrap().id, "p1");

        let events = drain_events(&mut rx);
        assert!(events.iter().any(|e| matches!(e, PlayerEvent::TrackStarted { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            PlayerEvent::UpNext { next, .. } if next.id == "p1"
        )));
    }

    #[tokio::test]
    async fn test_no_prefetch_while_queue_has_tracks() {
        let (engine, _media) = test_engine();
        let session = engine.sessions.get_or_create(SID).await;
        session.state.lock().await.queue.push_back(track("t2", "Next"));

        engine.handle_track_started(SID, track("t1", "Song")).await;

        let state = session.state.lock().await;
        assert!(state.pending_autoplay.is_none());
    }

    #[tokio::test]
    async fn test_skip_requires_current_track() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();

        let skipped = engine.skip(SID).await.unwrap();
        assert_eq!(skipped.id, "t1");
        assert!(media.calls().contains(&MediaCall::Stop(SID)));

        // Simulate the media node reporting the stop; session goes idle
        engine.set_autoplay(SID, false).await.unwrap();
        engine.handle_track_ended(SID, TrackEndReason::Stopped).await;
        let err = engine.skip(SID).await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_pause_resume_transitions() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();

        engine.pause(SID).await.unwrap();
        assert!(matches!(engine.pause(SID).await.unwrap_err(), Error::InvalidState(_)));
        engine.resume(SID).await.unwrap();
        assert!(matches!(engine.resume(SID).await.unwrap_err(), Error::InvalidState(_)));

        assert!(media.calls().contains(&MediaCall::Pause(SID, true)));
        assert!(media.calls().contains(&MediaCall::Pause(SID, false)));
    }

    #[tokio::test]
    async fn test_stop_tears_down_session() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "lofi beats")]);
        engine.play(SID, "song").await.unwrap();
        engine.handle_track_started(SID, track("t1", "lofi beats")).await;
        {
            let session = engine.sessions.get(SID).await.unwrap();
            session.state.lock().await.queue.push_back(track("t2", "Next"));
        }

        engine.stop(SID).await.unwrap();

        // Session destroyed: taste, queue, and timers went with it
        assert!(engine.sessions.get(SID).await.is_none());
        assert!(media.calls().contains(&MediaCall::Stop(SID)));
        assert!(media.calls().contains(&MediaCall::Disconnect(SID)));
        assert!(matches!(engine.stop(SID).await.unwrap_err(), Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_queue_editing_commands() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            let mut state = session.state.lock().await;
            for i in 2..=5 {
                state.queue.push_back(track(&format!("t{}", i), "Queued"));
            }
        }

        // 1-based removal
        let removed = engine.remove_at(SID, 2).await.unwrap();
        assert_eq!(removed.id, "t3");
        assert!(matches!(engine.remove_at(SID, 0).await.unwrap_err(), Error::InvalidInput(_)));
        assert!(matches!(engine.remove_at(SID, 9).await.unwrap_err(), Error::InvalidInput(_)));

        // Shuffle keeps the same multiset
        engine.shuffle_queue(SID).await.unwrap();
        let session = engine.sessions.get(SID).await.unwrap();
        let mut ids: Vec<String> = {
            let state = session.state.lock().await;
            state.queue.iter().map(|t| t.id.clone()).collect()
        };
        ids.sort();
        assert_eq!(ids, vec!["t2", "t4", "t5"]);

        let dropped = engine.clear_queue(SID).await.unwrap();
        assert_eq!(dropped, 3);
        assert!(matches!(engine.clear_queue(SID).await.unwrap_err(), Error::InvalidState(_)));
        assert!(matches!(engine.shuffle_queue(SID).await.unwrap_err(), Error::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_jump_drops_skipped_entries() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();
        {
            let session = engine.sessions.get(SID).await.unwrap();
            let mut state = session.state.lock().await;
            for i in 2..=4 {
                state.queue.push_back(track(&format!("t{}", i), "Queued"));
            }
        }

        let target = engine.jump_to(SID, 2).await.unwrap();
        assert_eq!(target.id, "t3");
        assert_eq!(media.played_ids(), vec!["t1", "t3"]);

        let session = engine.sessions.get(SID).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.current.as_ref().unwrap().id, "t3");
        // t2 dropped, t4 remains
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.queue[0].id, "t4");
    }

    #[tokio::test]
    async fn test_volume_clamped_to_100() {
        let (engine, media) = test_engine();
        let stored = engine.set_volume(SID, 150).await.unwrap();
        assert_eq!(stored, 100);
        assert!(media.calls().contains(&MediaCall::SetVolume(SID, 100)));
    }

    #[tokio::test]
    async fn test_idle_timer_respects_resumed_playback() {
        let (engine, media) = test_engine();
        media.script_tracks("song", vec![track("t1", "Song")]);
        engine.play(SID, "song").await.unwrap();

        // Timer fires while something is playing: no disconnect
        engine.idle_timer_fired(SID).await;
        assert!(engine.sessions.get(SID).await.is_some());
        assert!(!media.calls().contains(&MediaCall::Disconnect(SID)));
    }

    #[tokio::test]
    async fn test_idle_timer_disconnects_and_removes_session() {
        let (engine, media) = test_engine();
        let session = engine.sessions.get_or_create(SID).await;
        drop(session);
        let mut rx = engine.subscribe_events();

        engine.idle_timer_fired(SID).await;

        assert!(engine.sessions.get(SID).await.is_none());
        assert!(media.calls().contains(&MediaCall::Disconnect(SID)));
        let events = drain_events(&mut rx);
        assert!(events.iter().any(|e| matches!(e, PlayerEvent::IdleDisconnected { .. })));
    }

    #[tokio::test]
    async fn test_voice_state_arms_and_cancels_alone_timer() {
        let (engine, _media) = test_engine();
        let session = engine.sessions.get_or_create(SID).await;

        engine.handle_voice_state(SID, 0).await;
        assert!(session.state.lock().await.alone_timer.is_some());

        engine.handle_voice_state(SID, 2).await;
        assert!(session.state.lock().await.alone_timer.is_none());
    }

    #[tokio::test]
    async fn test_alone_timer_rechecks_listeners() {
        let (engine, media) = test_engine();
        let session = engine.sessions.get_or_create(SID).await;
        session.state.lock().await.listeners = 3;

        engine.alone_timer_fired(SID).await;
        assert!(engine.sessions.get(SID).await.is_some());

        session.state.lock().await.listeners = 0;
        let mut rx = engine.subscribe_events();
        engine.alone_timer_fired(SID).await;
        assert!(engine.sessions.get(SID).await.is_none());
        assert!(media.calls().contains(&MediaCall::Disconnect(SID)));
        let events = drain_events(&mut rx);
        assert!(events.iter().any(|e| matches!(e, PlayerEvent::AloneDisconnected { .. })));
    }
}
