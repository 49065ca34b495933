//! Bidirectional mapping between configuration trees and typed resources.
//!
//! Each supported resource kind implements [`Flatten`] (typed resource into
//! tree form) and [`Expand`] (tree form into typed resource). Nested kinds
//! delegate to the mapping of the nested type, so a job reuses the pod
//! template mapping, which in turn reuses the metadata and container
//! mappings.
use std::{collections::BTreeMap, num::ParseIntError};

use serde_json::Value;
use snafu::Snafu;

use crate::{
    schema::{self, BlockList, SchemaPath},
    state::DeclaredState,
};

pub mod container;
pub mod job;
pub mod metadata;
pub mod pod_template;
pub mod selector;

/// The error type for mapping operations.
///
/// All resource kinds share this type, so an error raised while mapping a
/// nested resource reaches the caller unchanged instead of being wrapped at
/// every nesting level.
#[derive(Debug, PartialEq, Snafu)]
pub enum Error {
    /// Indicates that a string-encoded numeric field holds something other
    /// than a decimal number.
    #[snafu(display("failed to parse integer value {value:?} of field {field:?}"))]
    ParseIntField {
        source: ParseIntError,
        field: String,
        value: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decomposition of a typed resource into its configuration tree form.
pub trait Flatten {
    /// Decomposes the resource into a block list.
    ///
    /// The resource itself is left untouched. Normalizations like dropping
    /// server-written labels operate on copies, never on the input.
    fn flatten(&self, ctx: &FlattenContext<'_>) -> Result<BlockList>;
}

/// Composition of a typed resource from its configuration tree form.
pub trait Expand: Sized {
    /// Composes a resource from `blocks`.
    ///
    /// An empty list or a leading null composes the default resource. A
    /// field that fails to compose aborts the whole composition; partially
    /// composed resources are never returned.
    fn expand(blocks: &[Value]) -> Result<Self>;
}

/// Read context threaded through a decomposition.
///
/// Carries the declared state together with the schema path of the block
/// currently being decomposed. Nested mappings use it to look up what the
/// user actually declared, which is how server-written values are told apart
/// from user-declared ones carrying the same key.
#[derive(Clone)]
pub struct FlattenContext<'a> {
    state: &'a dyn DeclaredState,
    prefix: SchemaPath,
}

impl<'a> FlattenContext<'a> {
    /// Returns a context rooted at the top of the configuration tree.
    pub fn new(state: &'a dyn DeclaredState) -> Self {
        Self {
            state,
            prefix: SchemaPath::new(),
        }
    }

    /// Returns a context rooted at `prefix`.
    pub fn with_prefix(state: &'a dyn DeclaredState, prefix: SchemaPath) -> Self {
        Self { state, prefix }
    }

    /// Returns the context for the nested block `field` below this one.
    ///
    /// Nested blocks are lists with at most one element, so the path
    /// descends through the block name and the element index `0`.
    pub fn nested_block(&self, field: &str) -> Self {
        Self {
            state: self.state,
            prefix: self.prefix.child(field).child("0"),
        }
    }

    /// Returns the state key of `field` below this context's path.
    pub fn key(&self, field: &str) -> String {
        self.prefix.key(field)
    }

    /// Returns the declared string map under `field`, if one is declared.
    pub fn declared_string_map(&self, field: &str) -> Option<BTreeMap<String, String>> {
        let declared = self.state.get(&self.key(field))?;
        schema::as_string_map(&declared)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::MemoryState;

    #[test]
    fn nested_blocks_descend_through_element_zero() {
        let state = MemoryState::new();
        let ctx = FlattenContext::with_prefix(
            &state,
            SchemaPath::from_segments(["spec", "0"]),
        );

        let nested = ctx.nested_block("template").nested_block("metadata");
        assert_eq!(nested.key("labels"), "spec.0.template.0.metadata.0.labels");
    }

    #[test]
    fn declared_string_maps_come_from_the_declared_tree() {
        let mut state = MemoryState::new();
        state.declare(
            "spec.0.template.0.metadata.0.labels",
            json!({"app": "db", "job-name": "importer"}),
        );

        let ctx = FlattenContext::with_prefix(
            &state,
            SchemaPath::from_segments(["spec", "0"]),
        );
        let labels = ctx
            .nested_block("template")
            .nested_block("metadata")
            .declared_string_map("labels")
            .expect("labels are declared");

        assert_eq!(labels.get("job-name").map(String::as_str), Some("importer"));
        assert_eq!(ctx.declared_string_map("labels"), None);
    }
}
