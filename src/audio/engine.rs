// Host media engine interface
// The host owns decoding and output; this crate only asks it to play or stop
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reference to a sound or video file the host can play
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaTag {
    pub filename: PathBuf,
}

impl MediaTag {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// Tag for a file on disk, made absolute when the file exists
    pub fn from_path(path: &Path) -> Self {
        let filename = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self { filename }
    }

    pub fn extension(&self) -> Option<String> {
        self.filename
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

impl fmt::Display for MediaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[sound:{}]", self.filename.display())
    }
}

/// Called once by the player when playback ends on its own
pub type OnPlaybackDone = Box<dyn FnOnce() + Send + 'static>;

/// One playback backend (e.g. a system mpv or a Qt media player)
pub trait MediaPlayer: Send + Sync {
    /// Start playing `tag`. Returns immediately; `on_done` fires when the
    /// media finishes. It may still fire after `stop`.
    fn play(&self, tag: &MediaTag, on_done: OnPlaybackDone);

    /// Request a stop. Takes effect asynchronously.
    fn stop(&self);
}

/// The host's audio/video player registry and queue
pub trait MediaEngine: Send + Sync {
    /// Player able to handle `tag`, best match first
    fn best_player_for(&self, tag: &MediaTag) -> Option<Arc<dyn MediaPlayer>>;

    /// Drop whatever the host queued to play next
    fn clear_queue(&self);

    /// Notification sent just before a tag starts playing
    fn will_play(&self, _tag: &MediaTag) {}

    /// Normal completion path, run after a session ends naturally
    fn play_finished(&self) {}
}
