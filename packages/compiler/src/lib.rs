//! # blockscript-compiler
//!
//! Turns a graph of connected editor blocks into a [`Program`] and checks it
//! before anything runs.
//!
//! The compiler never sees the editor itself. It reads blocks through the
//! [`BlockGraph`] / [`BlockNode`] traits, and a [`CompilerConfig`] tells it
//! which block type tags mean what for the current game.
//!
//! ```text
//! editor graph ──compile──▶ Program ──validate──▶ runtime
//!                 ▲
//!          CompilerConfig (per game)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use blockscript_compiler::{compile, preset, validate, MemoryGraph};
//!
//! let mut graph = MemoryGraph::new();
//! let start = graph.add_top("s", "when_run");
//! let step = graph.add_block("m", "maze_move_forward");
//! graph.set_field(step, "STEPS", 3);
//! graph.set_next(start, step);
//!
//! let config = preset("maze").unwrap();
//! let program = compile(&graph, config).unwrap();
//! validate(&program).unwrap();
//!
//! assert_eq!(program.len(), 2);
//! ```

mod compile;
mod config;
mod error;
mod fields;
mod graph;
mod memory_graph;
mod presets;
mod validate;

pub use compile::{compile, Compiler, BODY_INPUTS};
pub use config::{BlockClass, CompilerConfig, DEFAULT_MAX_BLOCKS, DEFAULT_MAX_DEPTH};
pub use error::{CompilationError, ValidationError};
pub use fields::{resolve_number, resolve_text, NumericField, LITERAL_FIELDS};
pub use graph::{BlockGraph, BlockNode, FieldValue};
pub use memory_graph::{BlockRef, MemoryGraph, MemoryNode};
pub use presets::{preset, preset_names};
pub use validate::{validate, ValidationLimits, Validator};

pub use blockscript_program::{BlockId, Direction, Op, OpKind, Program};
