//! Executes one program against one adapter.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use blockscript_program::Program;
use futures::FutureExt;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::adapter::{Adapter, Outcome};
use crate::cursor::Cursor;
use crate::error::RuntimeError;
use crate::handle::{CancelToken, RunId, RunOutcome, RunState, StateCell};
use crate::observer::{Completion, RunObserver};
use crate::runtime::RuntimeConfig;

/// Drives a single run.
///
/// An interpreter is used once: [`execute`](Interpreter::execute) consumes
/// it, so the `Running` state and the terminal state are each entered exactly
/// once.
pub struct Interpreter {
    id: RunId,
    program: Arc<Program>,
    observer: Arc<dyn RunObserver>,
    config: RuntimeConfig,
    state: StateCell,
}

impl Interpreter {
    /// Create an interpreter for a program.
    pub fn new(
        program: impl Into<Arc<Program>>,
        observer: Arc<dyn RunObserver>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            id: RunId::new(),
            program: program.into(),
            observer,
            config,
            state: StateCell::new(),
        }
    }

    /// The run's identifier.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// A shared view of the run's lifecycle state.
    pub fn state_cell(&self) -> StateCell {
        self.state.clone()
    }

    /// Reset the game, then execute every leaf instruction in order.
    ///
    /// Returns the outcome and the number of steps started. The observer has
    /// already been told about the outcome when this returns.
    pub async fn execute<A: Adapter>(
        self,
        adapter: &mut A,
        game: &mut A::State,
        cancel: &CancelToken,
    ) -> (RunOutcome, u64) {
        let span = info_span!("run", run = %self.id);
        async move {
            self.transition(RunState::Running).await;
            info!(ops = self.program.len(), "run started");

            match AssertUnwindSafe(adapter.reset(game)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return (self.fail(RuntimeError::Reset(e)).await, 0),
                Err(payload) => {
                    let error = RuntimeError::Aborted(format!(
                        "adapter panicked during reset: {}",
                        panic_message(&*payload)
                    ));
                    return (self.fail(error).await, 0);
                }
            }

            let mut cursor = Cursor::new(self.program.ops());
            let mut steps = 0u64;

            loop {
                if cancel.is_cancelled() {
                    return (self.cancelled(steps).await, steps);
                }

                let Some(op) = cursor.next_leaf() else {
                    break;
                };

                if steps >= self.config.max_steps {
                    let error = RuntimeError::StepLimit {
                        limit: self.config.max_steps,
                    };
                    return (self.fail(error).await, steps);
                }
                steps += 1;

                debug!(block = %op.block, op = %op, step = steps, "step");
                self.notify(|observer| observer.on_step(&op.block));

                let applied = AssertUnwindSafe(adapter.apply_op(op, game))
                    .catch_unwind()
                    .await;
                match applied {
                    Ok(Ok(Outcome::Continue)) => {}
                    Ok(Ok(Outcome::Win(message))) => {
                        return (self.complete(Completion::Won(message)).await, steps);
                    }
                    Ok(Ok(Outcome::Failure(message))) => {
                        return (self.complete(Completion::Lost(message)).await, steps);
                    }
                    Ok(Err(source)) => {
                        let error = RuntimeError::Step {
                            block: op.block.clone(),
                            source,
                        };
                        return (self.fail(error).await, steps);
                    }
                    Err(payload) => {
                        let error = RuntimeError::Aborted(format!(
                            "adapter panicked at block '{}': {}",
                            op.block,
                            panic_message(&*payload)
                        ));
                        return (self.fail(error).await, steps);
                    }
                }
            }

            (self.complete(Completion::Finished).await, steps)
        }
        .instrument(span)
        .await
    }

    async fn transition(&self, state: RunState) {
        self.state.set(state).await;
        self.notify(|observer| observer.on_status(&state.to_string()));
    }

    /// Invoke an observer callback. A panicking observer is logged and
    /// otherwise ignored; it never changes how the run ends.
    fn notify(&self, callback: impl FnOnce(&dyn RunObserver)) {
        let observer: &dyn RunObserver = &*self.observer;
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(observer))) {
            warn!(panic = %panic_message(&*payload), "observer panicked");
        }
    }

    async fn complete(&self, completion: Completion) -> RunOutcome {
        info!(?completion, "run completed");
        self.transition(RunState::Done).await;
        self.notify(|observer| observer.on_done(&completion));
        RunOutcome::Completed(completion)
    }

    async fn fail(&self, error: RuntimeError) -> RunOutcome {
        warn!(%error, "run failed");
        self.transition(RunState::Failed).await;
        self.notify(|observer| observer.on_error(&error));
        RunOutcome::Failed(error)
    }

    async fn cancelled(&self, steps: u64) -> RunOutcome {
        info!(steps, "run cancelled");
        self.transition(RunState::Cancelled).await;
        self.notify(|observer| observer.on_cancelled());
        RunOutcome::Cancelled
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
