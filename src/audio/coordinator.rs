// Playback coordinator
// Adds a protected priority class on top of the host's best-effort player
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::engine::{MediaEngine, MediaPlayer, MediaTag};

/// What happened to a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// A protected session is playing and the request was best-effort
    Dropped,
    /// No host player can handle the tag; nothing changed
    NoPlayer,
}

/// The one in-flight playback
struct PlaybackSession {
    id: u64,
    player: Arc<dyn MediaPlayer>,
    tag: MediaTag,
    protected: bool,
}

#[derive(Default)]
struct CoordinatorState {
    session: Option<PlaybackSession>,
    next_id: u64,
}

/// Owns at most one playback session.
///
/// Best-effort requests replace a best-effort session and are dropped while a
/// protected session plays. Protected requests replace anything.
pub struct PlaybackCoordinator {
    engine: Arc<dyn MediaEngine>,
    state: Arc<Mutex<CoordinatorState>>,
}

impl PlaybackCoordinator {
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(CoordinatorState::default())),
        }
    }

    /// Best-effort play
    pub fn play(&self, tag: MediaTag) -> PlayOutcome {
        self.start(tag, false)
    }

    /// Play audio that later best-effort requests cannot interrupt
    pub fn play_protected(&self, tag: MediaTag) -> PlayOutcome {
        self.start(tag, true)
    }

    /// Stop the active session, protected or not
    pub fn force_stop(&self) {
        let session = self.state.lock().session.take();
        if let Some(session) = session {
            log::debug!("[Playback] Force stopping {}", session.tag);
            session.player.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().session.is_some()
    }

    pub fn is_protected(&self) -> bool {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|s| s.protected)
            .unwrap_or(false)
    }

    pub fn current_tag(&self) -> Option<MediaTag> {
        self.state.lock().session.as_ref().map(|s| s.tag.clone())
    }

    fn start(&self, tag: MediaTag, protected: bool) -> PlayOutcome {
        // Look the player up first so a missing backend leaves the current
        // session untouched
        let Some(player) = self.engine.best_player_for(&tag) else {
            log::warn!("[Playback] No player found for {}", tag);
            return PlayOutcome::NoPlayer;
        };

        let (id, previous) = {
            let mut state = self.state.lock();
            if !protected && state.session.as_ref().is_some_and(|s| s.protected) {
                log::debug!("[Playback] Dropping {}: protected audio is playing", tag);
                return PlayOutcome::Dropped;
            }
            state.next_id += 1;
            let id = state.next_id;
            let previous = state.session.replace(PlaybackSession {
                id,
                player: Arc::clone(&player),
                tag: tag.clone(),
                protected,
            });
            (id, previous)
        };

        // The lock is released before calling into the engine: players may
        // run their completion callback synchronously
        if let Some(previous) = previous {
            previous.player.stop();
        }
        self.engine.clear_queue();
        self.engine.will_play(&tag);

        log::debug!(
            "[Playback] Starting session {} for {} (protected: {})",
            id,
            tag,
            protected
        );
        let state = Arc::downgrade(&self.state);
        let engine = Arc::clone(&self.engine);
        player.play(&tag, Box::new(move || Self::on_finished(state, engine, id)));

        PlayOutcome::Started
    }

    fn on_finished(state: Weak<Mutex<CoordinatorState>>, engine: Arc<dyn MediaEngine>, id: u64) {
        let Some(state) = state.upgrade() else {
            return;
        };

        let finished = {
            let mut state = state.lock();
            let is_current = state.session.as_ref().is_some_and(|s| s.id == id);
            if is_current {
                state.session.take()
            } else {
                None
            }
        };

        match finished {
            Some(session) => {
                if session.protected {
                    log::debug!("[Playback] Protected session {} finished", id);
                }
                engine.play_finished();
            }
            // Stopped or superseded; the session it belonged to is gone
            None => log::debug!("[Playback] Ignoring completion of stale session {}", id),
        }
    }
}
