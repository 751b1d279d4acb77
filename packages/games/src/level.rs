//! Loading levels from JSON.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;

/// A level description that can be read from a JSON file.
///
/// Implementors check their own invariants during deserialization, so a
/// level that loads is always playable.
pub trait Level: DeserializeOwned {
    fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading level {}...", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
