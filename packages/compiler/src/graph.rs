//! Block-graph reader traits.
//!
//! The compiler reads the editor's blocks only through these traits. A graph
//! hands out its top-level blocks; each block knows its type tag, its
//! successor, the blocks plugged into its named inputs and its literal field
//! values. How the blocks are stored or rendered is the graph's business.

/// A literal value stored in a block field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Interpret the value as a finite number.
    ///
    /// Text is trimmed and parsed; anything that does not parse, or parses to
    /// NaN or infinity, yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Interpret the value as text. Numbers are formatted.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(_) => None,
        }
    }

    /// Interpret the value as a flag. Pen states `down`/`up` count too.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "down" => Some(true),
                "false" | "up" => Some(false),
                _ => None,
            },
            FieldValue::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// One block as seen by the compiler.
///
/// Implementations are cheap handles (typically a reference or an index into
/// the owning graph), so `next` and `input` return new handles by value.
pub trait BlockNode: Sized {
    /// The editor's identifier for this block.
    fn id(&self) -> &str;

    /// The block's type tag, e.g. `maze_move_forward`.
    fn kind(&self) -> &str;

    /// The block connected below this one, if any.
    fn next(&self) -> Option<Self>;

    /// The block plugged into the named input (loop bodies, value slots).
    fn input(&self, name: &str) -> Option<Self>;

    /// The literal value of the named field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// A workspace of blocks.
pub trait BlockGraph {
    /// Handle type for blocks in this graph.
    type Node<'g>: BlockNode
    where
        Self: 'g;

    /// Blocks that are not attached under another block, in editor order.
    fn top_blocks(&self) -> Vec<Self::Node<'_>>;
}
