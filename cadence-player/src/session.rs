//! Voice session registry and per-session state
//!
//! One `Session` exists per voice channel the service is attached to.
//! All mutable per-session data lives behind a single async mutex that
//! is held across entire playback transitions, including awaited media
//! calls, so transitions for one session never interleave. Different
//! sessions proceed independently.

use crate::config::Config;
use crate::taste::TasteProfile;
use cadence_common::{LoopMode, PlaybackState, SessionId, Track};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

/// Everything mutable about one voice session
pub struct SessionState {
    /// Autoplay on by default; user-toggleable
    pub autoplay_enabled: bool,
    pub loop_mode: LoopMode,
    pub queue: VecDeque<Track>,
    pub current: Option<Track>,
    pub playback: PlaybackState,
    /// Prefetched autoplay candidate, consumed when the current track ends
    pub pending_autoplay: Option<Track>,
    pub taste: TasteProfile,
    /// Seeded per session; all random selection draws from here
    pub rng: SmallRng,
    pub idle_timer: Option<JoinHandle<()>>,
    pub alone_timer: Option<JoinHandle<()>>,
    /// Listeners currently in the voice channel (excluding the player)
    pub listeners: u32,
    pub volume: u8,
}

impl SessionState {
    fn new(config: &Config) -> Self {
        Self {
            autoplay_enabled: true,
            loop_mode: LoopMode::Off,
            queue: VecDeque::new(),
            current: None,
            playback: PlaybackState::Idle,
            pending_autoplay: None,
            taste: TasteProfile::new(config.history_limit, config.anti_repeat_limit),
            rng: SmallRng::from_entropy(),
            idle_timer: None,
            alone_timer: None,
            listeners: 0,
            volume: config.default_volume,
        }
    }

    /// Cancel the idle-disconnect timer if one is armed
    pub fn cancel_idle_timer(&mut self) {
        if let Some(handle) = self.idle_timer.take() {
            handle.abort();
        }
    }

    /// Cancel the alone-disconnect timer if one is armed
    pub fn cancel_alone_timer(&mut self) {
        if let Some(handle) = self.alone_timer.take() {
            handle.abort();
        }
    }

    /// Reset playback state for teardown: queue, current track, pending
    /// autoplay, taste history, and any armed timers all go.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
        self.playback = PlaybackState::Idle;
        self.pending_autoplay = None;
        self.taste.clear();
        self.cancel_idle_timer();
        self.cancel_alone_timer();
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        self.cancel_idle_timer();
        self.cancel_alone_timer();
    }
}

/// One voice session. Cheap to clone via `Arc` in the registry.
pub struct Session {
    pub id: SessionId,
    pub state: Mutex<SessionState>,
}

impl Session {
    fn new(id: SessionId, config: &Config) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState::new(config)),
        }
    }
}

/// All live sessions, keyed by voice channel id
pub struct SessionRegistry {
    config: Config,
    inner: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a session, creating it on first use
    pub async fn get_or_create(&self, id: SessionId) -> Arc<Session> {
        if let Some(session) = self.inner.read().await.get(&id) {
            return Arc::clone(session);
        }
        let mut map = self.inner.write().await;
        // Re-check under the write lock
        Arc::clone(map.entry(id).or_insert_with(|| {
            debug!(session_id = id.0, "creating session");
            Arc::new(Session::new(id, &self.config))
        }))
    }

    /// Look up an existing session without creating one
    pub async fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.inner.read().await.get(&id).map(Arc::clone)
    }

    /// Drop a session entirely. Safe to call for unknown ids.
    pub async fn remove(&self, id: SessionId) {
        if self.inner.write().await.remove(&id).is_some() {
            debug!(session_id = id.0, "removed session");
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
