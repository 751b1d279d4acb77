//! The game adapter contract.
//!
//! The runtime knows nothing about mazes, turtles or farms. Every game plugs
//! in through an [`Adapter`], which applies one instruction to that game's
//! state and says whether the game should go on.

use async_trait::async_trait;
use blockscript_program::Op;

use crate::error::AdapterError;

/// What happened after an adapter applied an instruction.
///
/// `Win` and `Failure` are expected ends of a level, not errors: the adapter
/// has reached a terminal game state and the program stops right there. The
/// message is shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// The level is solved.
    Win(String),
    /// The level is lost, e.g. the character hit a wall.
    Failure(String),
}

impl Outcome {
    pub fn win(message: impl Into<String>) -> Self {
        Outcome::Win(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure(message.into())
    }

    /// True for `Win` and `Failure`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// A game's implementation of the runtime contract.
///
/// The state type is the game's own; the runtime only passes it through.
/// `apply_op` may suspend for as long as the instruction's animation takes.
/// The runtime treats each call as atomic: it never cancels one halfway.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use blockscript_program::{Op, OpKind};
/// use blockscript_runtime::{Adapter, AdapterError, Outcome};
///
/// struct Line;
///
/// #[async_trait]
/// impl Adapter for Line {
///     type State = i32;
///
///     async fn apply_op(
///         &mut self,
///         op: &Op,
///         x: &mut i32,
///     ) -> Result<Outcome, AdapterError> {
///         match op.kind {
///             OpKind::Move { steps } => *x += steps,
///             OpKind::Start => {}
///             _ => return Err(AdapterError::unsupported(&op.kind)),
///         }
///         Ok(if *x >= 10 { Outcome::win("reached the flag") } else { Outcome::Continue })
///     }
///
///     async fn reset(&mut self, x: &mut i32) -> Result<(), AdapterError> {
///         *x = 0;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Adapter: Send {
    /// The game state this adapter drives.
    type State: Send;

    /// Apply one leaf instruction. Never called with `Repeat`.
    async fn apply_op(
        &mut self,
        op: &Op,
        state: &mut Self::State,
    ) -> Result<Outcome, AdapterError>;

    /// Restore the level's starting condition. Called before every run.
    async fn reset(&mut self, state: &mut Self::State) -> Result<(), AdapterError>;
}

#[async_trait]
impl<A: Adapter + ?Sized> Adapter for Box<A> {
    type State = A::State;

    async fn apply_op(
        &mut self,
        op: &Op,
        state: &mut Self::State,
    ) -> Result<Outcome, AdapterError> {
        (**self).apply_op(op, state).await
    }

    async fn reset(&mut self, state: &mut Self::State) -> Result<(), AdapterError> {
        (**self).reset(state).await
    }
}
