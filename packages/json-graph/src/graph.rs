//! The JSON block graph and its node handles.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use blockscript_compiler::{BlockGraph, BlockNode, FieldValue};
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

/// One serialized block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockJson {
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// Editor identifier. Filled with a fresh UUID when missing.
    #[serde(default)]
    pub id: String,

    /// Literal field values by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,

    /// Blocks plugged into named inputs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Connection>,

    /// The block connected below this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Connection>,
}

/// A connection slot holding a real block, a shadow (default literal) block,
/// or both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Box<BlockJson>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Box<BlockJson>>,
}

impl Connection {
    /// The effective block: the real one, else the shadow.
    pub fn target(&self) -> Option<&BlockJson> {
        self.block.as_deref().or(self.shadow.as_deref())
    }
}

// Chains nest one level per block, so the default recursive drop could
// overflow the stack on long programs. Children are detached and dropped
// from a work list instead.
impl Drop for BlockJson {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut block) = pending.pop() {
            detach_children(&mut block, &mut pending);
        }
    }
}

fn detach_children(block: &mut BlockJson, pending: &mut Vec<Box<BlockJson>>) {
    for connection in block.inputs.values_mut().chain(block.next.as_mut()) {
        pending.extend(connection.block.take());
        pending.extend(connection.shadow.take());
    }
}

/// The top-level blocks of a document.
///
/// Accepts a bare list, `{"blocks": [...]}`, or the versioned
/// `{"blocks": {"languageVersion": 0, "blocks": [...]}}`.
struct Document(Vec<BlockJson>);

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BlockList { wrappers: 2 }
            .deserialize(deserializer)
            .map(Document)
    }
}

/// A list of blocks, possibly inside up to `wrappers` `{"blocks": ...}`
/// objects.
#[derive(Clone, Copy)]
struct BlockList {
    wrappers: u8,
}

impl<'de> DeserializeSeed<'de> for BlockList {
    type Value = Vec<BlockJson>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for BlockList {
    type Value = Vec<BlockJson>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wrappers > 0 {
            f.write_str("a list of blocks or an object with a `blocks` key")
        } else {
            f.write_str("a list of blocks")
        }
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut blocks = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(block) = seq.next_element()? {
            blocks.push(block);
        }
        Ok(blocks)
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        if self.wrappers == 0 {
            return Err(de::Error::invalid_type(de::Unexpected::Map, &self));
        }
        let inner = BlockList {
            wrappers: self.wrappers - 1,
        };

        let mut blocks = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "blocks" {
                if blocks.is_some() {
                    return Err(de::Error::duplicate_field("blocks"));
                }
                blocks = Some(map.next_value_seed(inner)?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        blocks.ok_or_else(|| de::Error::missing_field("blocks"))
    }
}

/// A block graph loaded from JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonGraph {
    top: Vec<BlockJson>,
}

impl JsonGraph {
    /// Create a graph from already-deserialized top-level blocks.
    pub fn new(mut top: Vec<BlockJson>) -> Self {
        assign_missing_ids(&mut top);
        Self { top }
    }

    /// Parse a workspace from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_slice(bytes);
        let document = parse_document(&mut de)?;
        de.end()?;
        Ok(Self::new(document.0))
    }

    /// Parse a workspace from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        let document = parse_document(&mut de)?;
        de.end()?;
        Ok(Self::new(document.0))
    }

    /// Convert an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let document = Document::deserialize(serde_stacker::Deserializer::new(value))?;
        Ok(Self::new(document.0))
    }

    /// Load a workspace file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading {}...", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// The top-level blocks.
    pub fn blocks(&self) -> &[BlockJson] {
        &self.top
    }
}

/// Chains nest one level per block, far deeper than serde_json's recursion
/// limit allows. The limit is lifted and the stack grows on the heap instead.
fn parse_document<'de, R>(
    de: &mut serde_json::Deserializer<R>,
) -> std::result::Result<Document, serde_json::Error>
where
    R: serde_json::de::Read<'de>,
{
    de.disable_recursion_limit();
    Document::deserialize(serde_stacker::Deserializer::new(de))
}

impl FromStr for JsonGraph {
    type Err = crate::JsonGraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

/// Give every block without an id a fresh one. Iterative, since chains can
/// be long.
fn assign_missing_ids(top: &mut [BlockJson]) {
    let mut stack: Vec<&mut BlockJson> = top.iter_mut().collect();
    while let Some(block) = stack.pop() {
        let BlockJson {
            id, inputs, next, ..
        } = block;
        if id.is_empty() {
            *id = Uuid::new_v4().to_string();
        }
        for connection in inputs.values_mut().chain(next.as_mut()) {
            stack.extend(connection.block.as_deref_mut());
            stack.extend(connection.shadow.as_deref_mut());
        }
    }
}

fn to_field(value: &serde_json::Value) -> Option<FieldValue> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number),
        serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
        serde_json::Value::Bool(b) => Some(FieldValue::Bool(*b)),
        _ => None,
    }
}

/// A block handle borrowed from a [`JsonGraph`].
#[derive(Debug, Clone, Copy)]
pub struct JsonNode<'g>(&'g BlockJson);

impl<'g> JsonNode<'g> {
    /// The underlying serialized block.
    pub fn block(&self) -> &'g BlockJson {
        self.0
    }
}

impl BlockNode for JsonNode<'_> {
    fn id(&self) -> &str {
        &self.0.id
    }

    fn kind(&self) -> &str {
        &self.0.kind
    }

    fn next(&self) -> Option<Self> {
        self.0.next.as_ref().and_then(Connection::target).map(JsonNode)
    }

    fn input(&self, name: &str) -> Option<Self> {
        self.0
            .inputs
            .get(name)
            .and_then(Connection::target)
            .map(JsonNode)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.0.fields.get(name).and_then(to_field)
    }
}

impl BlockGraph for JsonGraph {
    type Node<'g> = JsonNode<'g>;

    fn top_blocks(&self) -> Vec<Self::Node<'_>> {
        self.top.iter().map(JsonNode).collect()
    }
}
