//! Progress and outcome callbacks.

use std::sync::Arc;

use blockscript_program::BlockId;

use crate::error::RuntimeError;

/// How a run that was not cancelled and did not error came to an end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Every instruction ran and the adapter never ended the level.
    Finished,
    /// The adapter reported a win, with its message.
    Won(String),
    /// The adapter reported a lost level, with its message.
    Lost(String),
}

impl Completion {
    /// The adapter's message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Completion::Finished => None,
            Completion::Won(m) | Completion::Lost(m) => Some(m.as_str()),
        }
    }
}

/// Receives a run's progress.
///
/// Callbacks are invoked from the task driving the run, in order. For every
/// leaf instruction `on_step` fires right before the adapter is called.
/// Exactly one of `on_done`, `on_error` or `on_cancelled` ends the run.
pub trait RunObserver: Send + Sync {
    /// The instruction from `block` is about to execute.
    fn on_step(&self, block: &BlockId);

    /// Human-readable status text, sent on every state change.
    fn on_status(&self, status: &str) {
        let _ = status;
    }

    /// The run completed normally or through a win/loss.
    fn on_done(&self, completion: &Completion);

    /// The run was aborted by an error.
    fn on_error(&self, error: &RuntimeError);

    /// The run was stopped by the host.
    fn on_cancelled(&self) {}
}

impl<T: RunObserver + ?Sized> RunObserver for Arc<T> {
    fn on_step(&self, block: &BlockId) {
        (**self).on_step(block)
    }

    fn on_status(&self, status: &str) {
        (**self).on_status(status)
    }

    fn on_done(&self, completion: &Completion) {
        (**self).on_done(completion)
    }

    fn on_error(&self, error: &RuntimeError) {
        (**self).on_error(error)
    }

    fn on_cancelled(&self) {
        (**self).on_cancelled()
    }
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_step(&self, _block: &BlockId) {}

    fn on_done(&self, _completion: &Completion) {}

    fn on_error(&self, _error: &RuntimeError) {}
}

type StepFn = Box<dyn Fn(&BlockId) + Send + Sync>;
type StatusFn = Box<dyn Fn(&str) + Send + Sync>;
type DoneFn = Box<dyn Fn(&Completion) + Send + Sync>;
type ErrorFn = Box<dyn Fn(&RuntimeError) + Send + Sync>;
type CancelledFn = Box<dyn Fn() + Send + Sync>;

/// An observer assembled from closures. Unset callbacks do nothing.
///
/// ```rust
/// use blockscript_runtime::{Callbacks, RunObserver};
///
/// let callbacks = Callbacks::new()
///     .step(|block| println!("highlight {}", block))
///     .done(|completion| println!("done: {:?}", completion));
/// # let _ = callbacks;
/// ```
#[derive(Default)]
pub struct Callbacks {
    step: Option<StepFn>,
    status: Option<StatusFn>,
    done: Option<DoneFn>,
    error: Option<ErrorFn>,
    cancelled: Option<CancelledFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, f: impl Fn(&BlockId) + Send + Sync + 'static) -> Self {
        self.step = Some(Box::new(f));
        self
    }

    pub fn status(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.status = Some(Box::new(f));
        self
    }

    pub fn done(mut self, f: impl Fn(&Completion) + Send + Sync + 'static) -> Self {
        self.done = Some(Box::new(f));
        self
    }

    pub fn error(mut self, f: impl Fn(&RuntimeError) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    pub fn cancelled(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.cancelled = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("step", &self.step.is_some())
            .field("status", &self.status.is_some())
            .field("done", &self.done.is_some())
            .field("error", &self.error.is_some())
            .field("cancelled", &self.cancelled.is_some())
            .finish()
    }
}

impl RunObserver for Callbacks {
    fn on_step(&self, block: &BlockId) {
        if let Some(f) = &self.step {
            f(block)
        }
    }

    fn on_status(&self, status: &str) {
        if let Some(f) = &self.status {
            f(status)
        }
    }

    fn on_done(&self, completion: &Completion) {
        if let Some(f) = &self.done {
            f(completion)
        }
    }

    fn on_error(&self, error: &RuntimeError) {
        if let Some(f) = &self.error {
            f(error)
        }
    }

    fn on_cancelled(&self) {
        if let Some(f) = &self.cancelled {
            f()
        }
    }
}
