//! Error types for compilation and validation.

use blockscript_program::BlockId;
use thiserror::Error;

/// The block graph could not be turned into a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// No top-level block carries one of the configured start tags.
    #[error("no start block found (expected one of: {expected})")]
    MissingStart { expected: String },

    /// A block in the program chain has a type tag the configuration
    /// does not know.
    #[error("block '{id}' has unrecognized type '{kind}'")]
    UnknownBlock { id: BlockId, kind: String },

    /// Loops are nested deeper than the configured limit.
    #[error("loop '{id}' is nested deeper than {max} levels")]
    NestingTooDeep { id: BlockId, max: usize },
}

/// A compiled program is structurally unacceptable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The program has nothing to do besides its start marker.
    #[error("program is empty: attach some blocks to the start block")]
    Empty,

    /// A start marker appears somewhere other than the first position.
    #[error("start block '{block}' may only appear at the beginning of the program")]
    MisplacedStart { block: BlockId },

    /// A loop asks for more iterations than allowed.
    #[error("loop '{block}' repeats {count} times (maximum is {max})")]
    RepeatTooLarge { block: BlockId, count: u32, max: u32 },

    /// Loops are nested deeper than allowed.
    #[error("program nests loops {depth} levels deep (maximum is {max})")]
    TooDeep { depth: usize, max: usize },

    /// A numeric argument cannot be executed.
    #[error("block '{block}' has an invalid {field}: {value}")]
    InvalidNumber {
        block: BlockId,
        field: &'static str,
        value: f64,
    },
}
