//! Error types for the command-line tool.

use blockscript_compiler::{CompilationError, ValidationError};
use blockscript_games::LevelError;
use blockscript_json_graph::JsonGraphError;
use blockscript_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read program: {0}")]
    Graph(#[from] JsonGraphError),

    #[error("Cannot read level: {0}")]
    Level(#[from] LevelError),

    #[error("Compilation failed: {0}")]
    Compile(#[from] CompilationError),

    #[error("Invalid program: {0}")]
    Validate(#[from] ValidationError),

    #[error("Run failed: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Unknown game '{0}' (see `blockscript presets`)")]
    UnknownGame(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
