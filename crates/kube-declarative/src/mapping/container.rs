//! Mapping for container lists.
//!
//! Containers are the one place where a block list holds more than one
//! element. The list is ordered and the order survives both directions.
use k8s_openapi::api::core::v1::Container;
use serde_json::Value;

use crate::{
    mapping::Result,
    schema::{Block, BlockExt, string_list_value},
};

/// Decomposes a container list into a list of blocks.
pub fn flatten_containers(containers: &[Container]) -> Result<Vec<Value>> {
    containers.iter().map(flatten_container).collect()
}

fn flatten_container(container: &Container) -> Result<Value> {
    let mut block = Block::new();

    block.insert("name".to_owned(), Value::String(container.name.clone()));

    if let Some(image) = container.image.as_ref().filter(|image| !image.is_empty()) {
        block.insert("image".to_owned(), Value::String(image.clone()));
    }

    if let Some(command) = container.command.as_ref().filter(|command| !command.is_empty()) {
        block.insert("command".to_owned(), string_list_value(command));
    }

    if let Some(args) = container.args.as_ref().filter(|args| !args.is_empty()) {
        block.insert("args".to_owned(), string_list_value(args));
    }

    if let Some(policy) = container
        .image_pull_policy
        .as_ref()
        .filter(|policy| !policy.is_empty())
    {
        block.insert("image_pull_policy".to_owned(), Value::String(policy.clone()));
    }

    if let Some(working_dir) = container
        .working_dir
        .as_ref()
        .filter(|working_dir| !working_dir.is_empty())
    {
        block.insert("working_dir".to_owned(), Value::String(working_dir.clone()));
    }

    Ok(Value::Object(block))
}

/// Composes a container list from a list of blocks.
pub fn expand_containers(blocks: &[Value]) -> Result<Vec<Container>> {
    blocks.iter().map(expand_container).collect()
}

fn expand_container(value: &Value) -> Result<Container> {
    let Some(block) = value.as_object() else {
        return Ok(Container::default());
    };
    let mut container = Container {
        name: block.string("name").unwrap_or_default().to_owned(),
        ..Container::default()
    };

    if let Some(image) = block.string("image").filter(|image| !image.is_empty()) {
        container.image = Some(image.to_owned());
    }

    if let Some(command) = block.strings("command").filter(|command| !command.is_empty()) {
        container.command = Some(command);
    }

    if let Some(args) = block.strings("args").filter(|args| !args.is_empty()) {
        container.args = Some(args);
    }

    if let Some(policy) = block
        .string("image_pull_policy")
        .filter(|policy| !policy.is_empty())
    {
        container.image_pull_policy = Some(policy.to_owned());
    }

    if let Some(working_dir) = block
        .string("working_dir")
        .filter(|working_dir| !working_dir.is_empty())
    {
        container.working_dir = Some(working_dir.to_owned());
    }

    Ok(container)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn generate_containers() -> Vec<Container> {
        vec![
            Container {
                name: "importer".to_owned(),
                image: Some("registry.example.com/importer:1.4".to_owned()),
                command: Some(vec!["sh".to_owned(), "-c".to_owned()]),
                args: Some(vec!["import --all".to_owned()]),
                image_pull_policy: Some("IfNotPresent".to_owned()),
                ..Container::default()
            },
            Container {
                name: "sidecar".to_owned(),
                image: Some("registry.example.com/sidecar:2.0".to_owned()),
                ..Container::default()
            },
        ]
    }

    #[test]
    fn containers_flatten_in_order() {
        let blocks = flatten_containers(&generate_containers()).expect("containers flatten");

        assert_eq!(
            Value::Array(blocks),
            json!([
                {
                    "name": "importer",
                    "image": "registry.example.com/importer:1.4",
                    "command": ["sh", "-c"],
                    "args": ["import --all"],
                    "image_pull_policy": "IfNotPresent",
                },
                {
                    "name": "sidecar",
                    "image": "registry.example.com/sidecar:2.0",
                },
            ])
        );
    }

    #[test]
    fn containers_round_trip() {
        let containers = generate_containers();

        let blocks = flatten_containers(&containers).expect("containers flatten");
        let expanded = expand_containers(&blocks).expect("containers expand");

        assert_eq!(expanded, containers);
    }

    #[test]
    fn empty_lists_stay_empty() {
        assert_eq!(
            flatten_containers(&[]).expect("containers flatten"),
            Vec::<Value>::new()
        );
        assert_eq!(expand_containers(&[]).expect("containers expand"), vec![]);
    }
}
