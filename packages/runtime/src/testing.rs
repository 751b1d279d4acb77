//! Test doubles for hosts and adapters.

use std::marker::PhantomData;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use blockscript_program::{BlockId, Op};

use crate::adapter::{Adapter, Outcome};
use crate::error::{AdapterError, RuntimeError};
use crate::observer::{Completion, RunObserver};

/// One recorded callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Step(BlockId),
    Status(String),
    Done(Completion),
    Error(RuntimeError),
    Cancelled,
}

/// Observer that records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn step_ids(&self) -> Vec<BlockId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Step(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<Completion> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Done(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Error(_)))
            .count()
    }
}

impl RunObserver for RecordingObserver {
    fn on_step(&self, block: &BlockId) {
        self.push(Event::Step(block.clone()));
    }

    fn on_status(&self, status: &str) {
        self.push(Event::Status(status.to_string()));
    }

    fn on_done(&self, completion: &Completion) {
        self.push(Event::Done(completion.clone()));
    }

    fn on_error(&self, error: &RuntimeError) {
        self.push(Event::Error(error.clone()));
    }

    fn on_cancelled(&self) {
        self.push(Event::Cancelled);
    }
}

type ResetFn<S> = Box<dyn FnMut(&mut S) -> Result<(), AdapterError> + Send>;

/// Adapter built from a closure, with an optional per-step delay.
pub struct FnAdapter<S, F> {
    apply: F,
    reset: Option<ResetFn<S>>,
    delay: Option<Duration>,
    _state: PhantomData<fn(S)>,
}

impl<S, F> FnAdapter<S, F>
where
    S: Send,
    F: FnMut(&Op, &mut S) -> Result<Outcome, AdapterError> + Send,
{
    pub fn new(apply: F) -> Self {
        Self {
            apply,
            reset: None,
            delay: None,
            _state: PhantomData,
        }
    }

    pub fn with_reset(
        mut self,
        reset: impl FnMut(&mut S) -> Result<(), AdapterError> + Send + 'static,
    ) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Sleep this long inside every `apply_op`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl<S, F> Adapter for FnAdapter<S, F>
where
    S: Send,
    F: FnMut(&Op, &mut S) -> Result<Outcome, AdapterError> + Send,
{
    type State = S;

    async fn apply_op(&mut self, op: &Op, state: &mut S) -> Result<Outcome, AdapterError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.apply)(op, state)
    }

    async fn reset(&mut self, state: &mut S) -> Result<(), AdapterError> {
        match self.reset.as_mut() {
            Some(reset) => reset(state),
            None => Ok(()),
        }
    }
}
