//! # Blockscript
//!
//! Turns the block graph of a visual programming editor into a tree of
//! instructions and plays it one instruction at a time against a game.
//!
//! ```text
//!  editor graph ──▶ compile ──▶ validate ──▶ Runtime ──▶ Adapter ──▶ game state
//!                                               │
//!                                               └──▶ RunObserver (on_step, on_done, ...)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use blockscript::{compile, preset, validate, JsonGraph, MazeAdapter, MazeLevel, MazeState};
//! use blockscript::{Heading, NoopObserver, Runtime};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let graph: JsonGraph = r#"[
//!     {"type": "when_run", "id": "s",
//!      "next": {"block": {"type": "move_forward", "id": "m", "fields": {"STEPS": 2}}}}
//! ]"#.parse().unwrap();
//!
//! let program = compile(&graph, preset("maze").unwrap()).unwrap();
//! validate(&program).unwrap();
//!
//! let level = MazeLevel::new(&["S.G"], Heading::East).unwrap();
//! let report = Runtime::default()
//!     .run(program, MazeAdapter::new(level), MazeState::default(), Arc::new(NoopObserver))
//!     .join()
//!     .await
//!     .unwrap();
//! assert_eq!(report.steps, 2);
//! # }
//! ```
//!
//! The pieces live in their own crates and are re-exported here:
//!
//! - [`program`]: the instruction model
//! - [`compiler`]: graph reader traits, presets, `compile` and `validate`
//! - [`json_graph`]: reader for the JSON workspace format
//! - [`runtime`]: the adapter contract and the stepwise runtime
//! - [`games`]: reference maze, artist and farm adapters (feature `games`)

pub use blockscript_compiler as compiler;
pub use blockscript_json_graph as json_graph;
pub use blockscript_program as program;
pub use blockscript_runtime as runtime;

#[cfg(feature = "games")]
pub use blockscript_games as games;

pub use blockscript_compiler::{
    compile, preset, preset_names, validate, BlockClass, BlockGraph, BlockNode, CompilationError,
    Compiler, CompilerConfig, FieldValue, MemoryGraph, ValidationError, ValidationLimits,
    Validator,
};
pub use blockscript_json_graph::{JsonGraph, JsonGraphError};
pub use blockscript_program::{BlockId, Direction, Op, OpKind, Program};
pub use blockscript_runtime::{
    run, Adapter, AdapterError, Callbacks, CancelToken, Completion, NoopObserver, Outcome,
    RunHandle, RunId, RunObserver, RunOutcome, RunReport, RunState, Runtime, RuntimeConfig,
    RuntimeError,
};

#[cfg(feature = "games")]
pub use blockscript_games::{
    ArtistAdapter, ArtistLevel, ArtistState, FarmAdapter, FarmLevel, FarmState, Heading, Level,
    LevelError, MazeAdapter, MazeLevel, MazeState, Pace,
};
