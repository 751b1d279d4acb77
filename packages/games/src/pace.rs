//! Animation timing.

use std::time::Duration;

/// How long the reference games take to animate.
///
/// The runtime itself never pauses. An adapter holding a `Pace` suspends
/// inside `apply_op` for one `per_step` per instruction. An instant pace
/// also skips `Wait` instructions, which is what tests and batch runs want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pace {
    per_step: Duration,
}

impl Pace {
    pub const INSTANT: Pace = Pace {
        per_step: Duration::ZERO,
    };

    pub fn per_step(per_step: Duration) -> Self {
        Self { per_step }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::per_step(Duration::from_millis(millis))
    }

    pub fn is_instant(&self) -> bool {
        self.per_step.is_zero()
    }

    pub fn step_duration(&self) -> Duration {
        self.per_step
    }

    /// Suspend for one animation step.
    pub async fn step(&self) {
        if !self.is_instant() {
            tokio::time::sleep(self.per_step).await;
        }
    }

    /// Suspend for a `Wait` instruction.
    pub async fn hold(&self, millis: u64) {
        if !self.is_instant() {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}
