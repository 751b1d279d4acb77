//! Structural checks on compiled programs.

use blockscript_program::{Op, OpKind, Program};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::ValidationError;

/// Limits enforced by the [`Validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Largest allowed loop count.
    pub max_repeat: u32,
    /// Deepest allowed loop nesting, counting the innermost leaf.
    pub max_depth: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_repeat: 10_000,
            max_depth: DEFAULT_MAX_DEPTH + 1,
        }
    }
}

/// Rejects programs that make no sense to run.
///
/// Runs before any runtime side effect. The first problem found is returned.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    /// Create a validator with the given limits.
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// The limits in use.
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Check a program.
    pub fn validate(&self, program: &Program) -> Result<(), ValidationError> {
        if !program.iter().any(|op| !matches!(op.kind, OpKind::Start)) {
            return Err(ValidationError::Empty);
        }

        let depth = program.depth();
        if depth > self.limits.max_depth {
            return Err(ValidationError::TooDeep {
                depth,
                max: self.limits.max_depth,
            });
        }

        for (index, op) in program.iter().enumerate() {
            if index == 0 && matches!(op.kind, OpKind::Start) {
                continue;
            }
            self.check(op)?;
        }
        Ok(())
    }

    fn check(&self, op: &Op) -> Result<(), ValidationError> {
        match &op.kind {
            OpKind::Start => Err(ValidationError::MisplacedStart {
                block: op.block.clone(),
            }),
            OpKind::Turn { degrees, .. } if !degrees.is_finite() => {
                Err(ValidationError::InvalidNumber {
                    block: op.block.clone(),
                    field: "degrees",
                    value: *degrees,
                })
            }
            OpKind::Width { width } if !width.is_finite() || *width <= 0.0 => {
                Err(ValidationError::InvalidNumber {
                    block: op.block.clone(),
                    field: "width",
                    value: *width,
                })
            }
            OpKind::Repeat { count, body } => {
                if *count > self.limits.max_repeat {
                    return Err(ValidationError::RepeatTooLarge {
                        block: op.block.clone(),
                        count: *count,
                        max: self.limits.max_repeat,
                    });
                }
                body.iter().try_for_each(|op| self.check(op))
            }
            _ => Ok(()),
        }
    }
}

/// Check a program with the default limits.
pub fn validate(program: &Program) -> Result<(), ValidationError> {
    Validator::default().validate(program)
}
