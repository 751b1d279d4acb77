//! Error types for the execution runtime.

use blockscript_program::{BlockId, OpKind};
use thiserror::Error;

/// A genuine failure inside a game adapter.
///
/// Win and failure outcomes are not errors; adapters report those through
/// [`crate::Outcome`]. This type is for everything else, and its message is
/// shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AdapterError {
    message: String,
}

impl AdapterError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The adapter does not implement this kind of instruction.
    pub fn unsupported(kind: &OpKind) -> Self {
        Self::new(format!("this game has no '{}' instruction", kind.name()))
    }

    /// The message, verbatim.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for AdapterError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for AdapterError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors that abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An adapter step failed.
    #[error("block '{block}' failed: {source}")]
    Step {
        block: BlockId,
        #[source]
        source: AdapterError,
    },

    /// The adapter could not restore the starting state.
    #[error("could not reset the game: {0}")]
    Reset(#[source] AdapterError),

    /// The program ran more steps than allowed.
    #[error("stopped after {limit} steps; a loop may be running too long")]
    StepLimit { limit: u64 },

    /// The adapter panicked, or the run task ended without reporting.
    #[error("run aborted: {0}")]
    Aborted(String),
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
