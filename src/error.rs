// Error types for the feedback layer
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Feedback handlers are already registered")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
