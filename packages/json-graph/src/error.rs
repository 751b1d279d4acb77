//! Error types for JSON graph loading.

use thiserror::Error;

/// Errors that can occur while loading a JSON block graph.
#[derive(Debug, Error)]
pub enum JsonGraphError {
    /// The document is not valid JSON or does not have the workspace shape.
    #[error("invalid block workspace: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for JSON graph operations.
pub type Result<T> = std::result::Result<T, JsonGraphError>;
