//! The Op type - one compiled instruction.

use serde::{Deserialize, Serialize};

use crate::BlockId;

/// Turn magnitude used when a block does not specify one.
pub const DEFAULT_TURN_DEGREES: f64 = 90.0;

/// Direction of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed multiplier for the direction: left is counter-clockwise (+1),
    /// right is clockwise (-1).
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => 1.0,
            Direction::Right => -1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// What an instruction does.
///
/// Every variant except `Repeat` is a leaf. The unit of `Move` is abstract;
/// adapters decide whether a step is a grid cell or a number of pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpKind {
    /// Entry point marker. No game effect.
    Start,
    /// Move by a signed number of steps (negative = backward).
    Move { steps: i32 },
    /// Rotate in place.
    Turn { direction: Direction, degrees: f64 },
    /// Pause for a number of milliseconds.
    Wait { millis: u64 },
    /// Lower or raise the drawing pen.
    Pen { down: bool },
    /// Set the stroke color.
    Color { color: String },
    /// Set the stroke width.
    Width { width: f64 },
    /// Pick up the item under the character.
    Collect,
    /// Plant a seed on the current plot.
    Plant,
    /// Water the current plot.
    Water,
    /// Harvest the current plot.
    Harvest,
    /// Run `body` `count` times.
    Repeat { count: u32, body: Vec<Op> },
}

impl OpKind {
    /// Short lowercase name, used in logs and status text.
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Start => "start",
            OpKind::Move { .. } => "move",
            OpKind::Turn { .. } => "turn",
            OpKind::Wait { .. } => "wait",
            OpKind::Pen { .. } => "pen",
            OpKind::Color { .. } => "color",
            OpKind::Width { .. } => "width",
            OpKind::Collect => "collect",
            OpKind::Plant => "plant",
            OpKind::Water => "water",
            OpKind::Harvest => "harvest",
            OpKind::Repeat { .. } => "repeat",
        }
    }
}

/// One compiled instruction together with the block it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Op {
    /// The originating editor block. Observational only.
    pub block: BlockId,

    /// The instruction itself.
    #[serde(flatten)]
    pub kind: OpKind,
}

impl Op {
    /// Create an op from its parts.
    pub fn new(block: impl Into<BlockId>, kind: OpKind) -> Self {
        Self {
            block: block.into(),
            kind,
        }
    }

    // === Construction helpers ===

    pub fn start(block: impl Into<BlockId>) -> Self {
        Self::new(block, OpKind::Start)
    }

    pub fn move_by(block: impl Into<BlockId>, steps: i32) -> Self {
        Self::new(block, OpKind::Move { steps })
    }

    /// A quarter turn in the given direction.
    pub fn turn(block: impl Into<BlockId>, direction: Direction) -> Self {
        Self::turn_by(block, direction, DEFAULT_TURN_DEGREES)
    }

    pub fn turn_by(block: impl Into<BlockId>, direction: Direction, degrees: f64) -> Self {
        Self::new(block, OpKind::Turn { direction, degrees })
    }

    pub fn wait(block: impl Into<BlockId>, millis: u64) -> Self {
        Self::new(block, OpKind::Wait { millis })
    }

    pub fn pen(block: impl Into<BlockId>, down: bool) -> Self {
        Self::new(block, OpKind::Pen { down })
    }

    pub fn color(block: impl Into<BlockId>, color: impl Into<String>) -> Self {
        Self::new(
            block,
            OpKind::Color {
                color: color.into(),
            },
        )
    }

    pub fn width(block: impl Into<BlockId>, width: f64) -> Self {
        Self::new(block, OpKind::Width { width })
    }

    pub fn collect(block: impl Into<BlockId>) -> Self {
        Self::new(block, OpKind::Collect)
    }

    pub fn plant(block: impl Into<BlockId>) -> Self {
        Self::new(block, OpKind::Plant)
    }

    pub fn water(block: impl Into<BlockId>) -> Self {
        Self::new(block, OpKind::Water)
    }

    pub fn harvest(block: impl Into<BlockId>) -> Self {
        Self::new(block, OpKind::Harvest)
    }

    pub fn repeat(block: impl Into<BlockId>, count: u32, body: Vec<Op>) -> Self {
        Self::new(block, OpKind::Repeat { count, body })
    }

    // === Inspection ===

    /// True for every op except `Repeat`.
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, OpKind::Repeat { .. })
    }

    /// The loop body of a `Repeat`, `None` for leaves.
    pub fn body(&self) -> Option<&[Op]> {
        match &self.kind {
            OpKind::Repeat { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Number of leaf ops in this subtree, counting each loop body once.
    pub fn leaf_count(&self) -> usize {
        match self.body() {
            Some(body) => body.iter().map(Op::leaf_count).sum(),
            None => 1,
        }
    }

    /// Nesting depth of this subtree. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self.body() {
            Some(body) => 1 + body.iter().map(Op::depth).max().unwrap_or(0),
            None => 1,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            OpKind::Move { steps } => write!(f, "move({})", steps),
            OpKind::Turn { direction, degrees } => write!(f, "turn({}, {})", direction, degrees),
            OpKind::Wait { millis } => write!(f, "wait({}ms)", millis),
            OpKind::Pen { down } => write!(f, "pen({})", if *down { "down" } else { "up" }),
            OpKind::Color { color } => write!(f, "color({})", color),
            OpKind::Width { width } => write!(f, "width({})", width),
            OpKind::Repeat { count, body } => write!(f, "repeat({}, {} ops)", count, body.len()),
            other => write!(f, "{}", other.name()),
        }
    }
}
