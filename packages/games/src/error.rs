//! Level loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid level: {0}")]
    Invalid(String),
}

impl LevelError {
    pub fn invalid(message: impl Into<String>) -> Self {
        LevelError::Invalid(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LevelError>;
