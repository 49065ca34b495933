//! Mapping for pod templates.
//!
//! A pod template nests metadata, which nests the label and annotation maps,
//! so this is where the recursive shape of the mapping shows. Only the
//! declarable subset of the pod spec is covered.
use k8s_openapi::{
    api::core::v1::{PodSpec, PodTemplateSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use serde_json::Value;

use crate::{
    mapping::{
        Expand, Flatten, FlattenContext, Result,
        container::{expand_containers, flatten_containers},
    },
    schema::{Block, BlockExt, BlockList, first_block, string_map_value},
};

impl Flatten for PodTemplateSpec {
    fn flatten(&self, ctx: &FlattenContext<'_>) -> Result<BlockList> {
        let mut block = Block::new();

        if let Some(metadata) = &self.metadata {
            let metadata = metadata.flatten(&ctx.nested_block("metadata"))?;
            block.insert("metadata".to_owned(), metadata.into());
        }

        if let Some(spec) = &self.spec {
            let spec = spec.flatten(&ctx.nested_block("spec"))?;
            block.insert("spec".to_owned(), spec.into());
        }

        Ok(BlockList::from_block(block))
    }
}

impl Expand for PodTemplateSpec {
    fn expand(blocks: &[Value]) -> Result<Self> {
        let Some(block) = first_block(blocks) else {
            return Ok(Self::default());
        };
        let mut template = Self::default();

        if let Some(metadata) = block.blocks("metadata").filter(|blocks| !blocks.is_empty()) {
            template.metadata = Some(ObjectMeta::expand(metadata)?);
        }

        if let Some(spec) = block.blocks("spec").filter(|blocks| !blocks.is_empty()) {
            template.spec = Some(PodSpec::expand(spec)?);
        }

        Ok(template)
    }
}

impl Flatten for PodSpec {
    fn flatten(&self, _ctx: &FlattenContext<'_>) -> Result<BlockList> {
        let mut block = Block::new();

        if !self.containers.is_empty() {
            let containers = flatten_containers(&self.containers)?;
            block.insert("container".to_owned(), Value::Array(containers));
        }

        if let Some(hostname) = self.hostname.as_ref().filter(|hostname| !hostname.is_empty()) {
            block.insert("hostname".to_owned(), Value::String(hostname.clone()));
        }

        if let Some(node_selector) = self
            .node_selector
            .as_ref()
            .filter(|node_selector| !node_selector.is_empty())
        {
            block.insert("node_selector".to_owned(), string_map_value(node_selector));
        }

        if let Some(restart_policy) = self
            .restart_policy
            .as_ref()
            .filter(|restart_policy| !restart_policy.is_empty())
        {
            block.insert(
                "restart_policy".to_owned(),
                Value::String(restart_policy.clone()),
            );
        }

        if let Some(service_account_name) = self
            .service_account_name
            .as_ref()
            .filter(|service_account_name| !service_account_name.is_empty())
        {
            block.insert(
                "service_account_name".to_owned(),
                Value::String(service_account_name.clone()),
            );
        }

        if let Some(termination_grace_period) = self.termination_grace_period_seconds {
            block.insert(
                "termination_grace_period_seconds".to_owned(),
                Value::from(termination_grace_period),
            );
        }

        Ok(BlockList::from_block(block))
    }
}

impl Expand for PodSpec {
    fn expand(blocks: &[Value]) -> Result<Self> {
        let Some(block) = first_block(blocks) else {
            return Ok(Self::default());
        };
        let mut spec = Self::default();

        if let Some(containers) = block.blocks("container") {
            spec.containers = expand_containers(containers)?;
        }

        if let Some(hostname) = block.string("hostname").filter(|hostname| !hostname.is_empty()) {
            spec.hostname = Some(hostname.to_owned());
        }

        if let Some(node_selector) = block
            .string_map("node_selector")
            .filter(|node_selector| !node_selector.is_empty())
        {
            spec.node_selector = Some(node_selector);
        }

        if let Some(restart_policy) = block
            .string("restart_policy")
            .filter(|restart_policy| !restart_policy.is_empty())
        {
            spec.restart_policy = Some(restart_policy.to_owned());
        }

        if let Some(service_account_name) = block
            .string("service_account_name")
            .filter(|service_account_name| !service_account_name.is_empty())
        {
            spec.service_account_name = Some(service_account_name.to_owned());
        }

        if let Some(termination_grace_period) = block
            .int("termination_grace_period_seconds")
            .filter(|termination_grace_period| *termination_grace_period >= 0)
        {
            spec.termination_grace_period_seconds = Some(termination_grace_period);
        }

        Ok(spec)
    }
}
