//! Blockscript instruction model.
//!
//! This crate holds the data contract between the block compiler and the
//! execution runtime:
//! - `BlockId`: identifier of the editor block an instruction came from
//! - `Op`: one compiled instruction (`OpKind` plus its originating block)
//! - `Program`: the full, immutable instruction tree for one run
//!
//! Nothing here has behavior beyond inspection. The compiler builds these
//! values, the validator and runtime only read them.
//!
//! # Example
//!
//! ```rust
//! use blockscript_program::{Direction, Op, Program};
//!
//! let program = Program::new(vec![
//!     Op::start("s"),
//!     Op::repeat("r", 4, vec![Op::move_by("m", 2), Op::turn("t", Direction::Right)]),
//! ]);
//!
//! assert_eq!(program.len(), 2);
//! assert_eq!(program.leaf_count(), 3);
//! assert_eq!(program.depth(), 2);
//! ```

mod block_id;
mod op;
mod program;

pub use block_id::BlockId;
pub use op::{Direction, Op, OpKind, DEFAULT_TURN_DEGREES};
pub use program::Program;
