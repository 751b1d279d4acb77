//! Block graph to program compilation.

use blockscript_program::{BlockId, Direction, Op, OpKind, Program};
use tracing::{debug, warn};

use crate::config::{BlockClass, CompilerConfig};
use crate::error::CompilationError;
use crate::fields::{resolve_number, resolve_text, NumericField};
use crate::graph::{BlockGraph, BlockNode};

/// Input names that may hold a loop body, in lookup order.
pub const BODY_INPUTS: [&str; 2] = ["DO", "SUBSTACK"];

const COLOR_FIELDS: [&str; 2] = ["COLOR", "COLOUR"];
const DEFAULT_COLOR: &str = "#000000";

/// Compile a block graph with the given configuration.
///
/// Equivalent to `Compiler::new(config).compile(graph)`.
pub fn compile<G: BlockGraph>(
    graph: &G,
    config: &CompilerConfig,
) -> Result<Program, CompilationError> {
    Compiler::new(config).compile(graph)
}

/// Walks a block graph and builds a [`Program`].
///
/// The walk starts at the first top-level start block and follows `next`
/// links, turning every visited block into exactly one [`Op`]. Loop bodies
/// are compiled recursively. A shared budget of `max_blocks` bounds the total
/// work, so cyclic or runaway graphs are truncated instead of hanging.
pub struct Compiler<'c> {
    config: &'c CompilerConfig,
    visited: usize,
    truncated: bool,
}

impl<'c> Compiler<'c> {
    /// Create a compiler for one compile pass.
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            visited: 0,
            truncated: false,
        }
    }

    /// True if the last compile hit the block budget.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Compile the graph.
    pub fn compile<G: BlockGraph>(&mut self, graph: &G) -> Result<Program, CompilationError> {
        self.visited = 0;
        self.truncated = false;

        let start = graph
            .top_blocks()
            .into_iter()
            .find(|block| self.config.classify(block.kind()) == Some(BlockClass::Start))
            .ok_or_else(|| CompilationError::MissingStart {
                expected: self
                    .config
                    .tags(BlockClass::Start)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let ops = self.compile_chain(Some(start), 0)?;
        debug!(blocks = self.visited, ops = ops.len(), "compiled program");
        Ok(Program::new(ops))
    }

    fn compile_chain<N: BlockNode>(
        &mut self,
        first: Option<N>,
        depth: usize,
    ) -> Result<Vec<Op>, CompilationError> {
        let mut ops = Vec::new();
        let mut current = first;

        while let Some(node) = current {
            if self.visited >= self.config.max_blocks {
                if !self.truncated {
                    warn!(
                        max_blocks = self.config.max_blocks,
                        at = node.id(),
                        "block budget exhausted, truncating program"
                    );
                    self.truncated = true;
                }
                break;
            }
            self.visited += 1;

            ops.push(self.compile_block(&node, depth)?);
            current = node.next();
        }

        Ok(ops)
    }

    fn compile_block<N: BlockNode>(
        &mut self,
        node: &N,
        depth: usize,
    ) -> Result<Op, CompilationError> {
        let id = BlockId::new(node.id());
        let class = self
            .config
            .classify(node.kind())
            .ok_or_else(|| CompilationError::UnknownBlock {
                id: id.clone(),
                kind: node.kind().to_string(),
            })?;

        let kind = match class {
            BlockClass::Start => OpKind::Start,
            BlockClass::Move => OpKind::Move {
                steps: to_steps(NumericField::STEPS.read(node)),
            },
            BlockClass::Back => OpKind::Move {
                steps: -to_steps(NumericField::STEPS.read(node)).saturating_abs(),
            },
            BlockClass::TurnLeft => OpKind::Turn {
                direction: Direction::Left,
                degrees: NumericField::DEGREES.read(node),
            },
            BlockClass::TurnRight => OpKind::Turn {
                direction: Direction::Right,
                degrees: NumericField::DEGREES.read(node),
            },
            BlockClass::Wait => OpKind::Wait {
                millis: wait_millis(node),
            },
            BlockClass::PenUp => OpKind::Pen { down: false },
            BlockClass::PenDown => OpKind::Pen { down: true },
            BlockClass::Color => OpKind::Color {
                color: resolve_text(node, &COLOR_FIELDS)
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            },
            BlockClass::Width => OpKind::Width {
                width: NumericField::WIDTH.read(node),
            },
            BlockClass::Collect => OpKind::Collect,
            BlockClass::Plant => OpKind::Plant,
            BlockClass::Water => OpKind::Water,
            BlockClass::Harvest => OpKind::Harvest,
            BlockClass::Repeat => {
                if depth + 1 > self.config.max_depth {
                    return Err(CompilationError::NestingTooDeep {
                        id,
                        max: self.config.max_depth,
                    });
                }
                let count = to_count(NumericField::TIMES.read(node));
                let body_start = BODY_INPUTS.iter().find_map(|name| node.input(name));
                let body = self.compile_chain(body_start, depth + 1)?;
                OpKind::Repeat { count, body }
            }
        };

        debug!(block = %id, kind = node.kind(), op = kind.name(), "compiled block");
        Ok(Op { block: id, kind })
    }
}

fn to_steps(n: f64) -> i32 {
    n.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

fn to_count(n: f64) -> u32 {
    n.trunc().clamp(0.0, u32::MAX as f64) as u32
}

fn to_millis(n: f64) -> u64 {
    n.round().clamp(0.0, u64::MAX as f64) as u64
}

/// Milliseconds win over seconds, seconds over the generic number fields.
fn wait_millis<N: BlockNode>(node: &N) -> u64 {
    let millis = resolve_number(node, NumericField::MILLIS.names)
        .or_else(|| resolve_number(node, NumericField::SECONDS.names).map(|s| s * 1000.0))
        .unwrap_or_else(|| NumericField::WAIT_GENERIC.read(node));
    to_millis(millis)
}
