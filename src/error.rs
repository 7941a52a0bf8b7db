use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpError {
    #[error("Growth error: {0}")]
    Grow(String),

    #[error("No mate: {0}")]
    NoMate(String),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GpError>;
