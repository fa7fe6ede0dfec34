//! Disconnect timers
//!
//! Two timers can take a session down: the idle timer (nothing playing
//! for too long) and the alone timer (no listeners left in the voice
//! channel). Both are spawned tasks whose handles live in the session
//! state; arming replaces any previous timer, and user activity cancels
//! them. A fired timer re-checks its condition under the session lock
//! before disconnecting, because the state may have changed while the
//! timer slept.

use crate::playback::engine::PlaybackEngine;
use crate::session::SessionState;
use cadence_common::{PlaybackState, PlayerEvent, SessionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Arm (or re-arm) the idle-disconnect timer
pub(crate) fn arm_idle_timer(
    engine: &Arc<PlaybackEngine>,
    state: &mut SessionState,
    session_id: SessionId,
) {
    state.cancel_idle_timer();
    let engine = Arc::clone(engine);
    let timeout = Duration::from_secs(engine.config.idle_timeout_secs);
    state.idle_timer = Some(tokio::spawn(async move {
        sleep(timeout).await;
        engine.idle_timer_fired(session_id).await;
    }));
}

/// Arm (or re-arm) the alone-disconnect timer
pub(crate) fn arm_alone_timer(
    engine: &Arc<PlaybackEngine>,
    state: &mut SessionState,
    session_id: SessionId,
) {
    state.cancel_alone_timer();
    let engine = Arc::clone(engine);
    let timeout = Duration::from_secs(engine.config.alone_timeout_secs);
    state.alone_timer = Some(tokio::spawn(async move {
        sleep(timeout).await;
        engine.alone_timer_fired(session_id).await;
    }));
}

impl PlaybackEngine {
    /// Idle timer expiry. Disconnects unless playback resumed while the
    /// timer slept.
    pub(crate) async fn idle_timer_fired(self: &Arc<Self>, session_id: SessionId) {
        let Some(session) = self.sessions.get(session_id).await else {
            return;
        };
        {
            let mut state = session.state.lock().await;
            // This task owns the handle; drop it without aborting ourselves
            state.idle_timer = None;
            if state.playback == PlaybackState::Playing {
                return;
            }
            self.emit(PlayerEvent::IdleDisconnected {
                session_id,
                timestamp: chrono::Utc::now(),
            });
            state.reset();
        }
        if let Err(e) = self.media.disconnect(session_id).await {
            warn!(session_id = session_id.0, error = %e, "disconnect failed");
        }
        self.sessions.remove(session_id).await;
        info!(session_id = session_id.0, "disconnected after idle timeout");
    }

    /// Alone timer expiry. Disconnects unless a listener returned while
    /// the timer slept. Fires even mid-playback: nobody is listening.
    pub(crate) async fn alone_timer_fired(self: &Arc<Self>, session_id: SessionId) {
        let Some(session) = self.sessions.get(session_id).await else {
            return;
        };
        {
            let mut state = session.state.lock().await;
            state.alone_timer = None;
            if state.listeners > 0 {
                return;
            }
            self.emit(PlayerEvent::AloneDisconnected {
                session_id,
                timestamp: chrono::Utc::now(),
            });
            state.reset();
        }
        if let Err(e) = self.media.disconnect(session_id).await {
            warn!(session_id = session_id.0, error = %e, "disconnect failed");
        }
        self.sessions.remove(session_id).await;
        info!(session_id = session_id.0, "disconnected, no listeners left");
    }
}
