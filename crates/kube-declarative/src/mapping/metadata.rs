//! Mapping for object metadata.
//!
//! Only the declarable subset of the metadata fields is mapped. Values the
//! server fills in on its own, like the last-applied-configuration
//! annotation, are dropped during decomposition so that they never read as
//! drift. An annotation under an internal key is kept if the user declared
//! that exact key themselves.
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::Value;

use crate::{
    consts::INTERNAL_ANNOTATION_KEYS,
    mapping::{Expand, Flatten, FlattenContext, Result},
    schema::{Block, BlockExt, BlockList, first_block, string_map_value},
};

fn is_internal_annotation(key: &str) -> bool {
    INTERNAL_ANNOTATION_KEYS.contains(&key)
}

impl Flatten for ObjectMeta {
    fn flatten(&self, ctx: &FlattenContext<'_>) -> Result<BlockList> {
        let mut block = Block::new();

        if let Some(annotations) = &self.annotations {
            let declared = ctx.declared_string_map("annotations").unwrap_or_default();
            let annotations: BTreeMap<_, _> = annotations
                .iter()
                .filter(|(key, _)| !is_internal_annotation(key) || declared.contains_key(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();

            if !annotations.is_empty() {
                block.insert("annotations".to_owned(), string_map_value(&annotations));
            }
        }

        if let Some(generate_name) = self
            .generate_name
            .as_ref()
            .filter(|generate_name| !generate_name.is_empty())
        {
            block.insert(
                "generate_name".to_owned(),
                Value::String(generate_name.clone()),
            );
        }

        if let Some(labels) = self.labels.as_ref().filter(|labels| !labels.is_empty()) {
            block.insert("labels".to_owned(), string_map_value(labels));
        }

        if let Some(name) = self.name.as_ref().filter(|name| !name.is_empty()) {
            block.insert("name".to_owned(), Value::String(name.clone()));
        }

        if let Some(namespace) = self
            .namespace
            .as_ref()
            .filter(|namespace| !namespace.is_empty())
        {
            block.insert("namespace".to_owned(), Value::String(namespace.clone()));
        }

        Ok(BlockList::from_block(block))
    }
}

impl Expand for ObjectMeta {
    fn expand(blocks: &[Value]) -> Result<Self> {
        let Some(block) = first_block(blocks) else {
            return Ok(Self::default());
        };
        let mut metadata = Self::default();

        if let Some(annotations) = block
            .string_map("annotations")
            .filter(|annotations| !annotations.is_empty())
        {
            metadata.annotations = Some(annotations);
        }

        if let Some(generate_name) = block
            .string("generate_name")
            .filter(|generate_name| !generate_name.is_empty())
        {
            metadata.generate_name = Some(generate_name.to_owned());
        }

        if let Some(labels) = block.string_map("labels").filter(|labels| !labels.is_empty()) {
            metadata.labels = Some(labels);
        }

        if let Some(name) = block.string("name").filter(|name| !name.is_empty()) {
            metadata.name = Some(name.to_owned());
        }

        if let Some(namespace) = block
            .string("namespace")
            .filter(|namespace| !namespace.is_empty())
        {
            metadata.namespace = Some(namespace.to_owned());
        }

        Ok(metadata)
    }
}
