//! Bidirectional mapping between declarative configuration trees and typed
//! Kubernetes resources.
//!
//! Declarative tooling describes resources as loosely typed trees of maps
//! and lists, while the Kubernetes API speaks in strongly typed objects.
//! This crate translates between the two worlds: [`mapping::Flatten`]
//! decomposes a typed resource into its tree form, [`mapping::Expand`]
//! composes a typed resource back out of a tree, and the patch generators
//! turn drift between an observed and a declared tree into RFC 6902 patch
//! documents ready to be submitted by an API client.

pub mod consts;
pub mod mapping;
pub mod patch;
pub mod schema;
pub mod state;

// External re-exports
pub use json_patch;
pub use jsonptr;
pub use k8s_openapi;
