//! Spawning runs.

use std::sync::Arc;

use blockscript_program::Program;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::Adapter;
use crate::handle::{CancelToken, RunHandle, RunReport};
use crate::interpreter::Interpreter;
use crate::observer::RunObserver;

/// Default ceiling on leaf instructions per run.
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// A run that would start more leaf instructions than this fails with
    /// `StepLimit`.
    pub max_steps: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Starts runs on the current tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Start executing `program` against `adapter`.
    ///
    /// The run is spawned as its own task and this returns immediately. The
    /// game state is moved into the run and handed back in the report from
    /// [`RunHandle::join`]. Must be called from within a tokio runtime.
    pub fn run<A>(
        &self,
        program: impl Into<Arc<Program>>,
        mut adapter: A,
        mut state: A::State,
        observer: Arc<dyn RunObserver>,
    ) -> RunHandle<A::State>
    where
        A: Adapter + 'static,
        A::State: 'static,
    {
        let interpreter = Interpreter::new(program, observer, self.config);
        let id = interpreter.id();
        let cell = interpreter.state_cell();
        let cancel = CancelToken::new();

        debug!(run = %id, "spawning run");
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let (outcome, steps) = interpreter.execute(&mut adapter, &mut state, &token).await;
            RunReport {
                id,
                outcome,
                state,
                steps,
            }
        });

        RunHandle::new(id, cancel, cell, task)
    }
}

/// Start a run with the default configuration.
pub fn run<A>(
    program: impl Into<Arc<Program>>,
    adapter: A,
    state: A::State,
    observer: Arc<dyn RunObserver>,
) -> RunHandle<A::State>
where
    A: Adapter + 'static,
    A::State: 'static,
{
    Runtime::default().run(program, adapter, state, observer)
}
