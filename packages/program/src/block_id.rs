//! Identifier of an editor block.

use serde::{Deserialize, Serialize};

/// Identifier of the editor block an instruction was compiled from.
///
/// The editor owns these identifiers; the core only carries them so the host
/// can highlight the block that is currently executing. They never influence
/// control flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Create a BlockId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_display() {
        let id = BlockId::new("abc123");
        assert_eq!(format!("{}", id), "abc123");
    }

    #[test]
    fn block_id_conversions() {
        let a: BlockId = "x".into();
        let b: BlockId = String::from("x").into();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "x");
        assert_eq!(b.into_inner(), "x");
    }

    #[test]
    fn block_id_serializes_as_string() {
        let id = BlockId::new("blk");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"blk\"");
    }
}
