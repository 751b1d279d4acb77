//! Depth-first walk over an instruction tree.

use blockscript_program::{Op, OpKind};

struct Frame<'p> {
    ops: &'p [Op],
    index: usize,
    remaining: u32,
}

/// Yields the leaf instructions of a program in execution order.
///
/// Loops are not unrolled up front. Each `Repeat` pushes a frame that walks
/// its body, and the body is walked again from the top for every iteration,
/// so nested loops are re-entered fresh on each pass. Loops that would yield
/// nothing (zero count or no leaves in the body) are skipped outright.
pub struct Cursor<'p> {
    frames: Vec<Frame<'p>>,
}

impl<'p> Cursor<'p> {
    /// Start at the first instruction of `ops`.
    pub fn new(ops: &'p [Op]) -> Self {
        Self {
            frames: vec![Frame {
                ops,
                index: 0,
                remaining: 1,
            }],
        }
    }

    /// Current loop nesting. The top level counts as 1; 0 once exhausted.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Advance to the next leaf instruction.
    pub fn next_leaf(&mut self) -> Option<&'p Op> {
        loop {
            let frame = self.frames.last_mut()?;

            if frame.index >= frame.ops.len() {
                if frame.remaining > 1 {
                    frame.remaining -= 1;
                    frame.index = 0;
                } else {
                    self.frames.pop();
                }
                continue;
            }

            let ops = frame.ops;
            let op = &ops[frame.index];
            frame.index += 1;

            match &op.kind {
                OpKind::Repeat { count, body } => {
                    if *count > 0 && op.leaf_count() > 0 {
                        self.frames.push(Frame {
                            ops: body,
                            index: 0,
                            remaining: *count,
                        });
                    }
                }
                _ => return Some(op),
            }
        }
    }
}

impl<'p> Iterator for Cursor<'p> {
    type Item = &'p Op;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_leaf()
    }
}
