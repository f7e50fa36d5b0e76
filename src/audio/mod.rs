// Audio playback module
// Wraps the host media engine with session and priority handling

pub mod coordinator;
pub mod engine;

pub use coordinator::{PlayOutcome, PlaybackCoordinator};
pub use engine::{MediaEngine, MediaPlayer, MediaTag, OnPlaybackDone};
