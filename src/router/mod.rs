// Web view message routing
// Handles `audiovisualFeedback#...` messages sent by theme scripts

pub mod gate;
pub mod message;

pub use gate::ShowAnswerGate;
pub use message::{MessageReply, MessageRouter, NAMESPACE};
