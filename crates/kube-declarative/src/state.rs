//! Change detection between the last observed and the currently declared
//! configuration tree.
//!
//! Patch generation compares the two trees field by field. The comparison
//! surface is deliberately small so that embedders with their own storage
//! layer only need to answer two questions: did this key change, and what is
//! declared for it now.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read access to the declared configuration tree and its drift against the
/// last observed tree.
///
/// Keys are the flat dotted keys produced by
/// [`SchemaPath::key`](crate::schema::SchemaPath::key), like
/// `spec.0.parallelism`.
pub trait DeclaredState {
    /// Returns true if the value under `key` differs between the observed
    /// and the declared tree. A key present on only one side counts as
    /// changed.
    fn has_change(&self, key: &str) -> bool;

    /// Returns the currently declared value under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;
}

/// An in-memory [`DeclaredState`] backed by two flat key/value maps.
///
/// Useful for tests and for embedders without a persistent state store.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MemoryState {
    observed: BTreeMap<String, Value>,
    declared: BTreeMap<String, Value>,
}

impl MemoryState {
    /// Returns a state with no observed and no declared values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the value last observed under `key`.
    pub fn observe(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.observed.insert(key.into(), value);
        self
    }

    /// Records the value currently declared under `key`.
    pub fn declare(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.declared.insert(key.into(), value);
        self
    }
}

impl DeclaredState for MemoryState {
    fn has_change(&self, key: &str) -> bool {
        self.observed.get(key) != self.declared.get(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.declared.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unchanged_keys_report_no_change() {
        let mut state = MemoryState::new();
        state
            .observe("spec.0.parallelism", json!(2))
            .declare("spec.0.parallelism", json!(2));

        assert!(!state.has_change("spec.0.parallelism"));
        assert!(!state.has_change("spec.0.backoff_limit"));
    }

    #[test]
    fn differing_values_report_a_change() {
        let mut state = MemoryState::new();
        state
            .observe("spec.0.parallelism", json!(1))
            .declare("spec.0.parallelism", json!(2));

        assert!(state.has_change("spec.0.parallelism"));
    }

    #[test]
    fn keys_present_on_one_side_report_a_change() {
        let mut state = MemoryState::new();
        state.observe("spec.0.manual_selector", json!(true));
        state.declare("spec.0.completions", json!(5));

        assert!(state.has_change("spec.0.manual_selector"));
        assert!(state.has_change("spec.0.completions"));
    }

    #[test]
    fn get_reads_the_declared_tree_only() {
        let mut state = MemoryState::new();
        state.observe("spec.0.parallelism", json!(1));
        state.declare("spec.0.completions", json!(5));

        assert_eq!(state.get("spec.0.parallelism"), None);
        assert_eq!(state.get("spec.0.completions"), Some(json!(5)));
    }
}
