//! Per-game compiler configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Default number of blocks compiled before the walk stops.
pub const DEFAULT_MAX_BLOCKS: usize = 500;

/// Default maximum loop nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// What a block type tag compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockClass {
    Start,
    Move,
    Back,
    TurnLeft,
    TurnRight,
    Repeat,
    Wait,
    PenUp,
    PenDown,
    Color,
    Width,
    Collect,
    Plant,
    Water,
    Harvest,
}

/// Maps a game's block type tags to instruction kinds.
///
/// This is the only game-specific input to the compiler. Each game ships its
/// own configuration (see [`crate::preset`]) or loads one from JSON:
///
/// ```rust
/// use blockscript_compiler::{BlockClass, CompilerConfig};
///
/// let config = CompilerConfig::from_json(r#"{
///     "classes": {
///         "start": ["when_run"],
///         "move": ["step"],
///         "repeat": ["loop"]
///     },
///     "max_blocks": 200
/// }"#).unwrap();
///
/// assert_eq!(config.classify("step"), Some(BlockClass::Move));
/// assert_eq!(config.classify("jump"), None);
/// assert_eq!(config.max_blocks, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Type tags per instruction class.
    pub classes: BTreeMap<BlockClass, BTreeSet<String>>,

    /// Total number of blocks compiled before the walk is cut off. Shared by
    /// the top-level chain and every loop body.
    pub max_blocks: usize,

    /// Maximum loop nesting depth.
    pub max_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            classes: BTreeMap::new(),
            max_blocks: DEFAULT_MAX_BLOCKS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompilerConfig {
    /// An empty configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Register type tags for a class.
    pub fn with<I, T>(mut self, class: BlockClass, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.classes
            .entry(class)
            .or_default()
            .extend(tags.into_iter().map(Into::into));
        self
    }

    /// Override the block budget.
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    /// Override the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Find the class of a type tag. When a tag is registered under several
    /// classes the first one in [`BlockClass`] order wins.
    pub fn classify(&self, tag: &str) -> Option<BlockClass> {
        self.classes
            .iter()
            .find(|(_, tags)| tags.contains(tag))
            .map(|(class, _)| *class)
    }

    /// Type tags registered for a class.
    pub fn tags(&self, class: BlockClass) -> impl Iterator<Item = &str> {
        self.classes
            .get(&class)
            .into_iter()
            .flat_map(|tags| tags.iter().map(String::as_str))
    }
}
