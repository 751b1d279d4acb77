//! JSON block graphs.
//!
//! Reads the workspace serialization used by Blockly-style editors and
//! exposes it through the compiler's [`BlockGraph`] trait:
//!
//! ```json
//! {
//!   "blocks": {
//!     "languageVersion": 0,
//!     "blocks": [
//!       {
//!         "type": "when_run", "id": "start",
//!         "next": { "block": { "type": "maze_move_forward", "id": "m1",
//!                              "fields": { "STEPS": 2 } } }
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Nested bodies live under `inputs.<NAME>.block`; value slots may carry a
//! `shadow` block instead, which is used when no real block is plugged in.
//! A bare array of top-level blocks is accepted too.
//!
//! # Example
//!
//! ```rust
//! use blockscript_compiler::{compile, preset};
//! use blockscript_json_graph::JsonGraph;
//!
//! let graph: JsonGraph = r#"[
//!     {"type": "when_run", "id": "s",
//!      "next": {"block": {"type": "move_forward", "id": "m"}}}
//! ]"#.parse().unwrap();
//!
//! let program = compile(&graph, preset("maze").unwrap()).unwrap();
//! assert_eq!(program.len(), 2);
//! ```

mod error;
mod graph;

pub use error::{JsonGraphError, Result};
pub use graph::{BlockJson, Connection, JsonGraph, JsonNode};

pub use blockscript_compiler::BlockGraph;
