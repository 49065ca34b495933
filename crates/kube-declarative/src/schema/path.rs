use std::fmt::{self, Display};

/// A dotted path addressing a block inside the configuration tree.
///
/// Nested resources are lists with at most one element, so descending into a
/// nested block appends the block name followed by the element index `0`.
/// The path `spec.0.template.0` addresses the pod template block of a job,
/// and [`SchemaPath::key`] derives the flat state keys stored under it, like
/// `spec.0.template.0.metadata`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// Returns the empty path, addressing the root of the tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a path built from `segments`.
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns this path extended by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns the state key addressing `field` below this path.
    pub fn key(&self, field: &str) -> String {
        if self.segments.is_empty() {
            field.to_owned()
        } else {
            format!("{self}.{field}")
        }
    }
}

impl Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_keys_are_bare_field_names() {
        assert_eq!(SchemaPath::new().key("parallelism"), "parallelism");
    }

    #[test]
    fn nested_paths_render_dotted() {
        let path = SchemaPath::from_segments(["spec", "0"])
            .child("template")
            .child("0");

        assert_eq!(path.to_string(), "spec.0.template.0");
        assert_eq!(path.key("metadata"), "spec.0.template.0.metadata");
    }

    #[test]
    fn child_leaves_the_parent_untouched() {
        let parent = SchemaPath::from_segments(["spec", "0"]);
        let child = parent.child("selector");

        assert_eq!(parent.to_string(), "spec.0");
        assert_eq!(child.to_string(), "spec.0.selector");
    }
}
