// Feedback policy module
// Decides when review events produce sounds and visual effects

pub mod ease;
pub mod event;
pub mod orchestrator;

pub use ease::{ButtonLayoutClassifier, Ease, EaseClassifier};
pub use event::{FeedbackEvent, FeedbackKind};
pub use orchestrator::FeedbackOrchestrator;
