//! # Blockscript Runtime
//!
//! Executes a compiled [`Program`] one leaf instruction at a time against a
//! game, reporting progress to the host as it goes.
//!
//! ## Core Concepts
//!
//! ### Adapters
//!
//! An [`Adapter`] is a game's side of the contract. It owns how each
//! instruction changes the game's state and how long it takes to animate.
//! The runtime knows nothing about mazes, canvases or fields: it hands each
//! leaf [`Op`](blockscript_program::Op) to the adapter and reads back an
//! [`Outcome`].
//!
//! - `Continue` moves on to the next instruction
//! - `Win` and `Failure` end the run normally, reported through `on_done`
//! - an `Err` aborts the run, reported through `on_error`
//!
//! ### Observers
//!
//! A [`RunObserver`] receives `on_step` right before every instruction,
//! with the id of the block it came from, so an editor can highlight the
//! block that is running. Exactly one of `on_done`, `on_error` or
//! `on_cancelled` ends every run.
//!
//! ### Runs
//!
//! [`Runtime::run`] spawns the run as a tokio task and returns a
//! [`RunHandle`]. The handle can stop the run, which takes effect before the
//! next instruction, and is joined to take the game state back.
//!
//! ```text
//!  Idle ──▶ Running ──┬──▶ Done        (finished, won or lost)
//!                     ├──▶ Failed      (adapter error, step limit)
//!                     └──▶ Cancelled   (stop)
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use blockscript_runtime::testing::FnAdapter;
//! use blockscript_runtime::{Callbacks, Op, OpKind, Outcome, Program, Runtime, RuntimeConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> blockscript_runtime::Result<()> {
//! let program = Program::new(vec![Op::repeat("r", 3, vec![Op::move_by("m", 2)])]);
//! let adapter = FnAdapter::new(|op: &Op, x: &mut i32| {
//!     if let OpKind::Move { steps } = op.kind {
//!         *x += steps;
//!     }
//!     Ok(Outcome::Continue)
//! });
//!
//! let callbacks = Callbacks::new()
//!     .step(|block| println!("highlight {block}"))
//!     .done(|completion| println!("done: {completion:?}"));
//!
//! let runtime = Runtime::new(RuntimeConfig::default());
//! let handle = runtime.run(program, adapter, 0, Arc::new(callbacks));
//! let report = handle.join().await?;
//! assert_eq!(report.state, 6);
//! # Ok(())
//! # }
//! ```
//!
//! Repeats are never passed to the adapter. The runtime walks their bodies
//! `count` times, and a repeat whose body has no instructions is skipped
//! entirely, whatever its count.

pub mod adapter;
pub mod cursor;
pub mod error;
pub mod handle;
pub mod interpreter;
pub mod observer;
pub mod runtime;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapter::{Adapter, Outcome};
pub use blockscript_program::{BlockId, Op, OpKind, Program};
pub use cursor::Cursor;
pub use error::{AdapterError, Result, RuntimeError};
pub use handle::{CancelToken, RunHandle, RunId, RunOutcome, RunReport, RunState, StateCell};
pub use interpreter::Interpreter;
pub use observer::{Callbacks, Completion, NoopObserver, RunObserver};
pub use runtime::{run, Runtime, RuntimeConfig, DEFAULT_MAX_STEPS};
