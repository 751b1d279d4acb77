//! Run identity, lifecycle state and the host-facing controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{Result, RuntimeError};
use crate::observer::Completion;

/// Unique identifier for one run, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a run: `Idle → Running → {Done | Failed | Cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created but not started.
    Idle,
    /// Executing instructions.
    Running,
    /// Finished, won or lost.
    Done,
    /// Aborted by an error.
    Failed,
    /// Stopped by the host.
    Cancelled,
}

impl RunState {
    /// True for `Done`, `Failed` and `Cancelled`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed | RunState::Cancelled)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Done => "done",
            RunState::Failed => "failed",
            RunState::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Shared, observable run state.
#[derive(Debug, Clone)]
pub struct StateCell(Arc<Mutex<RunState>>);

impl StateCell {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(RunState::Idle)))
    }

    pub async fn get(&self) -> RunState {
        *self.0.lock().await
    }

    pub(crate) async fn set(&self, state: RunState) {
        *self.0.lock().await = state;
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative cancellation flag, checked between instructions.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(Completion),
    Failed(RuntimeError),
    Cancelled,
}

impl RunOutcome {
    /// The lifecycle state this outcome corresponds to.
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Completed(_) => RunState::Done,
            RunOutcome::Failed(_) => RunState::Failed,
            RunOutcome::Cancelled => RunState::Cancelled,
        }
    }
}

/// Everything a finished run hands back to the host.
#[derive(Debug)]
pub struct RunReport<S> {
    pub id: RunId,
    pub outcome: RunOutcome,
    /// The game state as left by the last fully completed step.
    pub state: S,
    /// Number of leaf instructions started.
    pub steps: u64,
}

/// Controller for a spawned run.
///
/// The game state moves into the run and comes back through [`join`].
///
/// [`join`]: RunHandle::join
#[derive(Debug)]
pub struct RunHandle<S> {
    id: RunId,
    cancel: CancelToken,
    state: StateCell,
    task: JoinHandle<RunReport<S>>,
}

impl<S> RunHandle<S> {
    pub(crate) fn new(
        id: RunId,
        cancel: CancelToken,
        state: StateCell,
        task: JoinHandle<RunReport<S>>,
    ) -> Self {
        Self {
            id,
            cancel,
            state,
            task,
        }
    }

    /// The run's identifier.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Ask the run to stop before its next instruction.
    ///
    /// Idempotent, and a no-op once the run has finished. An instruction
    /// that is already animating completes first.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// A token that stops this run when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> RunState {
        self.state.get().await
    }

    /// True once the run task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end and take back its report.
    pub async fn join(self) -> Result<RunReport<S>> {
        self.task
            .await
            .map_err(|e| RuntimeError::Aborted(e.to_string()))
    }
}
