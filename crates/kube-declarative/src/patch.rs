//! Construction of RFC 6902 patch documents.
//!
//! Patch generation turns detected configuration drift into an ordered list
//! of operations against the live resource. Serializing a [`Patch`] yields
//! the wire form expected by the Kubernetes API server for
//! `application/json-patch+json` requests.
use json_patch::{RemoveOperation, ReplaceOperation};
use jsonptr::{Pointer, PointerBuf};
use serde_json::Value;

pub use json_patch::{Patch, PatchOperation};

/// Returns the wire path of `field` below `prefix`.
///
/// The prefix addresses the enclosing object on the wire, e.g. `/spec`, and
/// is combined with the camelCase field name into `/spec/parallelism`.
pub fn operation_path(prefix: &Pointer, field: &str) -> PointerBuf {
    let mut path = prefix.to_buf();
    path.push_back(field);
    path
}

/// Returns an operation replacing the value at `path`.
pub fn replace(path: PointerBuf, value: Value) -> PatchOperation {
    PatchOperation::Replace(ReplaceOperation { path, value })
}

/// Returns an operation removing the value at `path`.
pub fn remove(path: PointerBuf) -> PatchOperation {
    PatchOperation::Remove(RemoveOperation { path })
}
