//! Mapping for label selectors.
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use serde_json::Value;

use crate::{
    mapping::{Expand, Flatten, FlattenContext, Result},
    schema::{Block, BlockExt, BlockList, first_block, string_list_value, string_map_value},
};

impl Flatten for LabelSelector {
    fn flatten(&self, _ctx: &FlattenContext<'_>) -> Result<BlockList> {
        let mut block = Block::new();

        if let Some(labels) = self.match_labels.as_ref().filter(|labels| !labels.is_empty()) {
            block.insert("match_labels".to_owned(), string_map_value(labels));
        }

        if let Some(requirements) = self
            .match_expressions
            .as_ref()
            .filter(|requirements| !requirements.is_empty())
        {
            let requirements = requirements.iter().map(requirement_value).collect();
            block.insert("match_expressions".to_owned(), Value::Array(requirements));
        }

        Ok(BlockList::from_block(block))
    }
}

impl Expand for LabelSelector {
    fn expand(blocks: &[Value]) -> Result<Self> {
        let Some(block) = first_block(blocks) else {
            return Ok(Self::default());
        };
        let mut selector = Self::default();

        if let Some(labels) = block.string_map("match_labels").filter(|labels| !labels.is_empty()) {
            selector.match_labels = Some(labels);
        }

        if let Some(requirements) = block
            .blocks("match_expressions")
            .filter(|requirements| !requirements.is_empty())
        {
            selector.match_expressions =
                Some(requirements.iter().map(expand_requirement).collect());
        }

        Ok(selector)
    }
}

fn requirement_value(requirement: &LabelSelectorRequirement) -> Value {
    let mut block = Block::new();
    block.insert("key".to_owned(), Value::String(requirement.key.clone()));
    // Operators like In, NotIn or Exists pass through as plain strings, the
    // API server is the authority on which of them are valid.
    block.insert(
        "operator".to_owned(),
        Value::String(requirement.operator.clone()),
    );

    if let Some(values) = requirement.values.as_ref().filter(|values| !values.is_empty()) {
        block.insert("values".to_owned(), string_list_value(values));
    }

    Value::Object(block)
}

fn expand_requirement(value: &Value) -> LabelSelectorRequirement {
    let Some(block) = value.as_object() else {
        return LabelSelectorRequirement::default();
    };

    LabelSelectorRequirement {
        key: block.string("key").unwrap_or_default().to_owned(),
        operator: block.string("operator").unwrap_or_default().to_owned(),
        values: block.strings("values").filter(|values| !values.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::state::MemoryState;

    fn generate_selector() -> LabelSelector {
        LabelSelector {
            match_labels: Some(BTreeMap::from([("app".to_owned(), "db".to_owned())])),
            match_expressions: Some(vec![LabelSelectorRequirement {
                key: "tier".to_owned(),
                operator: "In".to_owned(),
                values: Some(vec!["backend".to_owned(), "cache".to_owned()]),
            }]),
        }
    }

    #[test]
    fn selectors_flatten_to_a_single_block() {
        let state = MemoryState::new();
        let ctx = FlattenContext::new(&state);

        let blocks = generate_selector().flatten(&ctx).expect("selectors flatten");
        assert_eq!(
            Value::from(blocks),
            json!([{
                "match_labels": {"app": "db"},
                "match_expressions": [
                    {"key": "tier", "operator": "In", "values": ["backend", "cache"]},
                ],
            }])
        );
    }

    #[test]
    fn empty_selectors_flatten_to_an_empty_block() {
        let state = MemoryState::new();
        let ctx = FlattenContext::new(&state);

        let blocks = LabelSelector::default()
            .flatten(&ctx)
            .expect("selectors flatten");
        assert_eq!(Value::from(blocks), json!([{}]));
    }

    #[test]
    fn selectors_round_trip() {
        let state = MemoryState::new();
        let ctx = FlattenContext::new(&state);
        let selector = generate_selector();

        let blocks = selector.flatten(&ctx).expect("selectors flatten");
        let expanded = LabelSelector::expand(&blocks).expect("selectors expand");

        assert_eq!(expanded, selector);
    }

    #[test]
    fn unspecified_selectors_expand_to_the_default() {
        assert_eq!(
            LabelSelector::expand(&[]).expect("selectors expand"),
            LabelSelector::default()
        );
        assert_eq!(
            LabelSelector::expand(&[Value::Null]).expect("selectors expand"),
            LabelSelector::default()
        );
    }

    #[test]
    fn requirements_without_values_stay_without_values() {
        let blocks = [json!({
            "match_expressions": [{"key": "tier", "operator": "Exists"}],
        })];

        let expanded = LabelSelector::expand(&blocks).expect("selectors expand");
        assert_eq!(
            expanded.match_expressions,
            Some(vec![LabelSelectorRequirement {
                key: "tier".to_owned(),
                operator: "Exists".to_owned(),
                values: None,
            }])
        );
    }
}
