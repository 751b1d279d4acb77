//! In-memory block graph.
//!
//! An arena of blocks linked by index. Hosts that keep their own editor
//! model can mirror it here, and tests use it to build graphs that JSON
//! cannot express, such as cycles.

use std::collections::BTreeMap;

use crate::graph::{BlockGraph, BlockNode, FieldValue};

/// Handle to a block inside a [`MemoryGraph`], returned by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(usize);

#[derive(Debug, Clone)]
struct MemoryBlock {
    id: String,
    kind: String,
    next: Option<usize>,
    inputs: BTreeMap<String, usize>,
    fields: BTreeMap<String, FieldValue>,
}

/// An arena-backed block graph.
///
/// # Example
///
/// ```rust
/// use blockscript_compiler::{BlockGraph, BlockNode, MemoryGraph};
///
/// let mut graph = MemoryGraph::new();
/// let start = graph.add_top("s", "when_run");
/// let step = graph.add_block("m", "move_forward");
/// graph.set_next(start, step);
///
/// let top = graph.top_blocks();
/// assert_eq!(top[0].next().map(|n| n.id().to_string()), Some("m".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    blocks: Vec<MemoryBlock>,
    top: Vec<usize>,
}

impl MemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block that is attached somewhere below another block.
    pub fn add_block(&mut self, id: impl Into<String>, kind: impl Into<String>) -> BlockRef {
        self.blocks.push(MemoryBlock {
            id: id.into(),
            kind: kind.into(),
            next: None,
            inputs: BTreeMap::new(),
            fields: BTreeMap::new(),
        });
        BlockRef(self.blocks.len() - 1)
    }

    /// Add a free-standing top-level block.
    pub fn add_top(&mut self, id: impl Into<String>, kind: impl Into<String>) -> BlockRef {
        let block = self.add_block(id, kind);
        self.top.push(block.0);
        block
    }

    /// Connect `to` below `from`. Refs from another graph are ignored.
    pub fn set_next(&mut self, from: BlockRef, to: BlockRef) {
        if self.contains(to) {
            if let Some(block) = self.blocks.get_mut(from.0) {
                block.next = Some(to.0);
            }
        }
    }

    /// Plug `target` into the named input of `block`.
    pub fn set_input(&mut self, block: BlockRef, name: impl Into<String>, target: BlockRef) {
        if self.contains(target) {
            if let Some(block) = self.blocks.get_mut(block.0) {
                block.inputs.insert(name.into(), target.0);
            }
        }
    }

    /// Set a literal field value.
    pub fn set_field(
        &mut self,
        block: BlockRef,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) {
        if let Some(block) = self.blocks.get_mut(block.0) {
            block.fields.insert(name.into(), value.into());
        }
    }

    /// Link the given blocks one below the other.
    pub fn chain(&mut self, blocks: &[BlockRef]) {
        for pair in blocks.windows(2) {
            self.set_next(pair[0], pair[1]);
        }
    }

    /// Number of blocks in the arena.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if the arena has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn contains(&self, block: BlockRef) -> bool {
        block.0 < self.blocks.len()
    }

    fn node(&self, index: usize) -> MemoryNode<'_> {
        MemoryNode { graph: self, index }
    }
}

/// A block handle borrowed from a [`MemoryGraph`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryNode<'g> {
    graph: &'g MemoryGraph,
    index: usize,
}

impl<'g> MemoryNode<'g> {
    // Indices only enter the arena through the checked builder methods.
    fn block(&self) -> &'g MemoryBlock {
        &self.graph.blocks[self.index]
    }
}

impl BlockNode for MemoryNode<'_> {
    fn id(&self) -> &str {
        &self.block().id
    }

    fn kind(&self) -> &str {
        &self.block().kind
    }

    fn next(&self) -> Option<Self> {
        self.block().next.map(|i| self.graph.node(i))
    }

    fn input(&self, name: &str) -> Option<Self> {
        self.block().inputs.get(name).map(|&i| self.graph.node(i))
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.block().fields.get(name).cloned()
    }
}

impl BlockGraph for MemoryGraph {
    type Node<'g> = MemoryNode<'g>;

    fn top_blocks(&self) -> Vec<Self::Node<'_>> {
        self.top.iter().map(|&i| self.node(i)).collect()
    }
}
