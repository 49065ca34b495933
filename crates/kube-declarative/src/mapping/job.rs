//! Mapping for job specs.
//!
//! The job mapping is the entry point of the crate. It decomposes a
//! [`JobSpec`] into its configuration tree form, composes the tree back into
//! a spec, and turns detected drift into an RFC 6902 patch document. The
//! selector and pod template mappings handle the nested blocks.
//!
//! Two job specific rules apply on top of the plain field mapping:
//!
//! - The job controller writes identity labels into the pod template so the
//!   created pods can be selected. Those labels are cluster-owned and are
//!   dropped during decomposition, unless the user declared the same label
//!   key themselves.
//! - `backoff_limit` has a server-side default. A spec carrying exactly the
//!   default value reads the same as a spec not carrying the field at all,
//!   on both sides of the mapping.
use json_patch::Patch;
use jsonptr::Pointer;
use k8s_openapi::{
    api::{batch::v1::JobSpec, core::v1::PodTemplateSpec},
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};
use serde_json::Value;
use snafu::ResultExt as _;
use tracing::debug;

use crate::{
    consts::JOB_CONTROLLER_LABEL_KEYS,
    mapping::{Expand, Flatten, FlattenContext, ParseIntFieldSnafu, Result},
    patch,
    schema::{Block, BlockExt, BlockList, SchemaPath, first_block},
    state::DeclaredState,
};

/// Server-side defaults the API applies to unset job spec fields.
///
/// A value equal to its entry here is treated as unset on both sides of the
/// mapping, so a server-defaulted field never shows up as drift.
const IMPLICIT_DEFAULTS: &[(&str, i64)] = &[("backoff_limit", 6)];

fn is_implicit_default(field: &str, value: i64) -> bool {
    IMPLICIT_DEFAULTS
        .iter()
        .any(|(name, default)| *name == field && *default == value)
}

fn is_job_controller_label(key: &str) -> bool {
    JOB_CONTROLLER_LABEL_KEYS.contains(&key)
}

impl Flatten for JobSpec {
    fn flatten(&self, ctx: &FlattenContext<'_>) -> Result<BlockList> {
        let mut block = Block::new();

        if let Some(active_deadline) = self.active_deadline_seconds {
            block.insert(
                "active_deadline_seconds".to_owned(),
                Value::from(active_deadline),
            );
        }

        if let Some(backoff_limit) = self.backoff_limit.filter(|backoff_limit| {
            !is_implicit_default("backoff_limit", i64::from(*backoff_limit))
        }) {
            block.insert("backoff_limit".to_owned(), Value::from(backoff_limit));
        }

        if let Some(completions) = self.completions {
            block.insert("completions".to_owned(), Value::from(completions));
        }

        if let Some(completion_mode) = self
            .completion_mode
            .as_ref()
            .filter(|completion_mode| !completion_mode.is_empty())
        {
            block.insert(
                "completion_mode".to_owned(),
                Value::String(completion_mode.clone()),
            );
        }

        if let Some(manual_selector) = self.manual_selector {
            block.insert("manual_selector".to_owned(), Value::Bool(manual_selector));
        }

        if let Some(parallelism) = self.parallelism {
            block.insert("parallelism".to_owned(), Value::from(parallelism));
        }

        if let Some(selector) = &self.selector {
            let selector = selector.flatten(&ctx.nested_block("selector"))?;
            block.insert("selector".to_owned(), selector.into());
        }

        let template = strip_job_controller_labels(&self.template, ctx);
        let template = template.flatten(&ctx.nested_block("template"))?;
        block.insert("template".to_owned(), template.into());

        if let Some(ttl) = self.ttl_seconds_after_finished {
            // The wire keeps this field as a string to sidestep numeric
            // precision differences between schema layers.
            block.insert(
                "ttl_seconds_after_finished".to_owned(),
                Value::String(ttl.to_string()),
            );
        }

        Ok(BlockList::from_block(block))
    }
}

/// Returns a copy of `template` without the labels the job controller wrote
/// into it. A label survives if the user declared the same key themselves.
fn strip_job_controller_labels(
    template: &PodTemplateSpec,
    ctx: &FlattenContext<'_>,
) -> PodTemplateSpec {
    let mut template = template.clone();
    let Some(labels) = template
        .metadata
        .as_mut()
        .and_then(|metadata| metadata.labels.as_mut())
    else {
        return template;
    };

    let declared = ctx
        .nested_block("template")
        .nested_block("metadata")
        .declared_string_map("labels")
        .unwrap_or_default();

    let before = labels.len();
    labels.retain(|key, _| !is_job_controller_label(key) || declared.contains_key(key));

    let stripped = before - labels.len();
    if stripped > 0 {
        debug!(
            label.count = stripped,
            "dropped job controller labels from pod template"
        );
    }

    template
}

impl Expand for JobSpec {
    fn expand(blocks: &[Value]) -> Result<Self> {
        let Some(block) = first_block(blocks) else {
            return Ok(Self::default());
        };
        let mut spec = Self::default();

        if let Some(active_deadline) = block
            .int("active_deadline_seconds")
            .filter(|active_deadline| *active_deadline > 0)
        {
            spec.active_deadline_seconds = Some(active_deadline);
        }

        if let Some(backoff_limit) = block
            .int("backoff_limit")
            .filter(|backoff_limit| !is_implicit_default("backoff_limit", *backoff_limit))
        {
            spec.backoff_limit = Some(backoff_limit as i32);
        }

        if let Some(completions) = block
            .int("completions")
            .filter(|completions| *completions > 0)
        {
            spec.completions = Some(completions as i32);
        }

        if let Some(completion_mode) = block
            .string("completion_mode")
            .filter(|completion_mode| !completion_mode.is_empty())
        {
            spec.completion_mode = Some(completion_mode.to_owned());
        }

        if let Some(manual_selector) = block.boolean("manual_selector") {
            spec.manual_selector = Some(manual_selector);
        }

        if let Some(parallelism) = block
            .int("parallelism")
            .filter(|parallelism| *parallelism >= 0)
        {
            spec.parallelism = Some(parallelism as i32);
        }

        if let Some(selector) = block.blocks("selector").filter(|selector| !selector.is_empty()) {
            spec.selector = Some(LabelSelector::expand(selector)?);
        }

        spec.template = PodTemplateSpec::expand(block.blocks("template").unwrap_or_default())?;

        if let Some(ttl) = block
            .string("ttl_seconds_after_finished")
            .filter(|ttl| !ttl.is_empty())
        {
            let parsed = ttl.parse().context(ParseIntFieldSnafu {
                field: "ttl_seconds_after_finished",
                value: ttl,
            })?;
            spec.ttl_seconds_after_finished = Some(parsed);
        }

        Ok(spec)
    }
}

/// One patchable job spec field: the state key it is declared under and its
/// name on the wire.
struct PatchableField {
    state_key: &'static str,
    wire_name: &'static str,
}

/// The fields covered by [`patch_job_spec`], in the order the batch/v1 API
/// declares them. Emission follows this table, which keeps the generated
/// document deterministic.
const PATCHABLE_FIELDS: &[PatchableField] = &[
    PatchableField {
        state_key: "parallelism",
        wire_name: "parallelism",
    },
    PatchableField {
        state_key: "active_deadline_seconds",
        wire_name: "activeDeadlineSeconds",
    },
    PatchableField {
        state_key: "manual_selector",
        wire_name: "manualSelector",
    },
    PatchableField {
        state_key: "backoff_limit",
        wire_name: "backoffLimit",
    },
];

/// Generates the patch document for drifted scalar job spec fields.
///
/// `path_prefix` addresses the job spec on the wire, e.g. `/spec`, while
/// `prefix` addresses the job spec block in the configuration tree. Every
/// changed field with a declared value emits one replace operation; a
/// changed field whose declared value vanished emits a remove operation.
/// Unchanged fields emit nothing, so an undrifted state yields the empty
/// patch.
pub fn patch_job_spec(
    path_prefix: &Pointer,
    prefix: &SchemaPath,
    state: &dyn DeclaredState,
) -> Result<Patch> {
    let mut operations = Vec::new();

    for field in PATCHABLE_FIELDS {
        let key = prefix.key(field.state_key);
        if !state.has_change(&key) {
            continue;
        }

        let path = patch::operation_path(path_prefix, field.wire_name);
        match state.get(&key) {
            Some(value) => operations.push(patch::replace(path, value)),
            None => operations.push(patch::remove(path)),
        }
    }

    Ok(Patch(operations))
}
