//! Layered field resolution.
//!
//! Numbers reach a block in one of two ways: typed straight into one of the
//! block's fields, or supplied by a literal value block plugged into one of
//! its inputs. Both tiers are searched with the same ordered list of
//! candidate names; the first value that parses wins.

use crate::graph::{BlockNode, FieldValue};

/// Field names that literal value blocks use for their content.
pub const LITERAL_FIELDS: [&str; 3] = ["NUM", "VALUE", "TEXT"];

/// A numeric block argument: candidate names in priority order plus the
/// value used when nothing resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    pub names: &'static [&'static str],
    pub default: f64,
}

impl NumericField {
    pub const STEPS: NumericField = NumericField {
        names: &["STEPS", "DISTANCE", "NUM", "N"],
        default: 1.0,
    };

    pub const DEGREES: NumericField = NumericField {
        names: &["DEGREES", "ANGLE", "NUM"],
        default: 90.0,
    };

    pub const TIMES: NumericField = NumericField {
        names: &["TIMES", "COUNT", "NUM"],
        default: 2.0,
    };

    pub const MILLIS: NumericField = NumericField {
        names: &["MS", "MILLIS"],
        default: 500.0,
    };

    pub const SECONDS: NumericField = NumericField {
        names: &["SECONDS", "SECS"],
        default: 0.5,
    };

    pub const WAIT_GENERIC: NumericField = NumericField {
        names: &["NUM", "N"],
        default: 500.0,
    };

    pub const WIDTH: NumericField = NumericField {
        names: &["WIDTH", "NUM"],
        default: 1.0,
    };

    /// Resolve the field, falling back to the default.
    pub fn read<N: BlockNode>(&self, node: &N) -> f64 {
        resolve_number(node, self.names).unwrap_or(self.default)
    }
}

/// Resolve a number from a block's own fields, then from literal blocks in
/// its inputs.
///
/// Malformed values are skipped as if absent.
pub fn resolve_number<N: BlockNode>(node: &N, names: &[&str]) -> Option<f64> {
    resolve(node, names, FieldValue::as_number)
}

/// Resolve a text value with the same two tiers as [`resolve_number`].
pub fn resolve_text<N: BlockNode>(node: &N, names: &[&str]) -> Option<String> {
    resolve(node, names, FieldValue::as_text)
}

fn resolve<N, T>(node: &N, names: &[&str], convert: fn(&FieldValue) -> Option<T>) -> Option<T>
where
    N: BlockNode,
{
    direct(node, names, convert).or_else(|| {
        names.iter().find_map(|slot| {
            let literal = node.input(slot)?;
            direct(&literal, names, convert)
                .or_else(|| direct(&literal, &LITERAL_FIELDS, convert))
        })
    })
}

fn direct<N, T>(node: &N, names: &[&str], convert: fn(&FieldValue) -> Option<T>) -> Option<T>
where
    N: BlockNode,
{
    names
        .iter()
        .find_map(|name| node.field(name).as_ref().and_then(convert))
}
