//! The configuration tree data model.
//!
//! Declarative tooling hands resources around as loosely typed trees: maps
//! from field names to values, where nested resources are wrapped in lists
//! with at most one element. This module provides the value model for those
//! trees plus typed read access on top of [`serde_json::Value`].
use std::{collections::BTreeMap, ops::Deref};

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod path;

pub use path::SchemaPath;

/// One schema block: the fields of a single resource in tree form.
pub type Block = serde_json::Map<String, Value>;

/// A list of schema blocks.
///
/// Optional nested resources are represented as a list containing at most one
/// block. An empty list, or a list whose first element is null, means the
/// resource is not specified.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BlockList(Vec<Value>);

impl BlockList {
    /// Returns an empty block list, meaning "not specified".
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a single block into the list-of-one representation.
    pub fn from_block(block: Block) -> Self {
        Self(vec![Value::Object(block)])
    }

    /// Returns the wrapped block, if one is specified.
    pub fn block(&self) -> Option<&Block> {
        first_block(&self.0)
    }
}

impl From<Block> for BlockList {
    fn from(block: Block) -> Self {
        Self::from_block(block)
    }
}

impl From<BlockList> for Value {
    fn from(blocks: BlockList) -> Self {
        Self::Array(blocks.0)
    }
}

impl Deref for BlockList {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Returns the first block of a block list, if one is specified.
///
/// An empty list and a list whose first element is not a block both read as
/// "not specified".
pub fn first_block(blocks: &[Value]) -> Option<&Block> {
    match blocks.first() {
        Some(Value::Object(block)) => Some(block),
        _ => None,
    }
}

/// Typed field access on a schema [`Block`].
///
/// Schema layers hand over dynamically typed data, so every accessor treats
/// an absent field and a field of the wrong type the same way: as [`None`].
pub trait BlockExt {
    /// Returns the integer value of `field`.
    fn int(&self, field: &str) -> Option<i64>;

    /// Returns the string value of `field`.
    fn string(&self, field: &str) -> Option<&str>;

    /// Returns the boolean value of `field`.
    fn boolean(&self, field: &str) -> Option<bool>;

    /// Returns the nested block list under `field`.
    fn blocks(&self, field: &str) -> Option<&[Value]>;

    /// Returns the string list under `field`, skipping non-string elements.
    fn strings(&self, field: &str) -> Option<Vec<String>>;

    /// Returns the string map under `field`, skipping non-string values.
    fn string_map(&self, field: &str) -> Option<BTreeMap<String, String>>;
}

impl BlockExt for Block {
    fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    fn string(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    fn boolean(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    fn blocks(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_array).map(Vec::as_slice)
    }

    fn strings(&self, field: &str) -> Option<Vec<String>> {
        let values = self.get(field).and_then(Value::as_array)?;
        Some(
            values
                .iter()
                .filter_map(|value| value.as_str().map(ToOwned::to_owned))
                .collect(),
        )
    }

    fn string_map(&self, field: &str) -> Option<BTreeMap<String, String>> {
        self.get(field).and_then(as_string_map)
    }
}

/// Reads a tree value as a string map, skipping non-string entries.
pub fn as_string_map(value: &Value) -> Option<BTreeMap<String, String>> {
    let entries = value.as_object()?;
    Some(
        entries
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_str()
                    .map(|value| (key.clone(), value.to_owned()))
            })
            .collect(),
    )
}

/// Encodes a string map as a tree value.
pub fn string_map_value(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect(),
    )
}

/// Encodes a string list as a tree value.
pub fn string_list_value(values: &[String]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|value| Value::String(value.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn block(value: Value) -> Block {
        match value {
            Value::Object(block) => block,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn typed_getters() {
        let block = block(json!({
            "parallelism": 2,
            "completion_mode": "Indexed",
            "manual_selector": true,
            "selector": [{"match_labels": {"app": "db"}}],
            "command": ["sh", "-c"],
            "labels": {"app": "db", "tier": "backend"},
        }));

        assert_eq!(block.int("parallelism"), Some(2));
        assert_eq!(block.string("completion_mode"), Some("Indexed"));
        assert_eq!(block.boolean("manual_selector"), Some(true));
        assert_eq!(block.blocks("selector").map(<[Value]>::len), Some(1));
        assert_eq!(
            block.strings("command"),
            Some(vec!["sh".to_owned(), "-c".to_owned()])
        );
        assert_eq!(
            block.string_map("labels"),
            Some(BTreeMap::from([
                ("app".to_owned(), "db".to_owned()),
                ("tier".to_owned(), "backend".to_owned()),
            ]))
        );
    }

    #[test]
    fn mismatched_types_read_as_absent() {
        let block = block(json!({
            "parallelism": "2",
            "completion_mode": 4,
            "selector": {"match_labels": {}},
        }));

        assert_eq!(block.int("parallelism"), None);
        assert_eq!(block.string("completion_mode"), None);
        assert_eq!(block.boolean("missing"), None);
        assert_eq!(block.blocks("selector"), None);
    }

    #[test]
    fn first_block_conventions() {
        assert_eq!(first_block(&[]), None);
        assert_eq!(first_block(&[Value::Null]), None);
        assert_eq!(first_block(&[json!("not a block")]), None);

        let blocks = [json!({"parallelism": 2})];
        assert_eq!(
            first_block(&blocks),
            Some(&block(json!({"parallelism": 2})))
        );
    }

    #[test]
    fn block_list_wraps_a_single_block() {
        let blocks = BlockList::from_block(block(json!({"parallelism": 2})));

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.block(), Some(&block(json!({"parallelism": 2}))));
        assert_eq!(Value::from(blocks), json!([{"parallelism": 2}]));
    }

    #[test]
    fn block_list_serializes_as_a_plain_list() {
        let blocks = BlockList::from_block(block(json!({"completions": 5})));

        let serialized = serde_json::to_value(&blocks).expect("block lists are valid JSON");
        assert_eq!(serialized, json!([{"completions": 5}]));

        let deserialized: BlockList =
            serde_json::from_value(serialized).expect("round-trips through JSON");
        assert_eq!(deserialized, blocks);
    }

    #[test]
    fn empty_block_list_means_not_specified() {
        assert_eq!(BlockList::new().block(), None);
    }

    #[test]
    fn string_maps_skip_non_string_entries() {
        assert_eq!(
            as_string_map(&json!({"app": "db", "replicas": 3})),
            Some(BTreeMap::from([("app".to_owned(), "db".to_owned())]))
        );
        assert_eq!(as_string_map(&json!(["app"])), None);
    }
}
