//! The Program type - a complete compiled script.

use serde::{Deserialize, Serialize};

use crate::{BlockId, Op};

/// An ordered, immutable instruction tree.
///
/// A Program is built once per compile and then only read: the validator
/// inspects it, the runtime walks it, and the host may keep it around for
/// display after the run ends. There are no mutating accessors.
///
/// Serializes as a plain array of ops.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    /// Create a program from its top-level ops.
    pub fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// The top-level ops in document order.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Iterate over the top-level ops.
    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    /// Number of top-level ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if there are no top-level ops at all.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of leaf ops, counting each loop body once.
    pub fn leaf_count(&self) -> usize {
        self.ops.iter().map(Op::leaf_count).sum()
    }

    /// Maximum nesting depth. An empty program has depth 0.
    pub fn depth(&self) -> usize {
        self.ops.iter().map(Op::depth).max().unwrap_or(0)
    }

    /// Block id of the first op, usually the start block.
    pub fn first_block(&self) -> Option<&BlockId> {
        self.ops.first().map(|op| &op.block)
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl From<Vec<Op>> for Program {
    fn from(ops: Vec<Op>) -> Self {
        Self::new(ops)
    }
}
