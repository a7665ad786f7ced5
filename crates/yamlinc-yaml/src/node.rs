//! Parsed YAML tree that can carry values produced by custom tag handlers.

use indexmap::IndexMap;
use std::convert::Infallible;
use yaml_rust2::Yaml;

/// A parsed YAML node.
///
/// Plain YAML parses into `Scalar`, `Sequence` and `Mapping`. A scalar whose
/// tag is owned by a [`TagHandler`](crate::TagHandler) becomes `Custom`,
/// holding whatever the handler produced. Custom values never appear as
/// mapping keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T> {
    /// Strings, numbers, booleans and null
    Scalar(Yaml),

    /// Sequence items in document order
    Sequence(Vec<Node<T>>),

    /// Mapping entries in insertion order
    Mapping(IndexMap<Yaml, Node<T>>),

    /// Value produced by a custom tag handler
    Custom(T),
}

impl<T> Node<T> {
    pub fn as_sequence(&self) -> Option<&[Node<T>]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<Yaml, Node<T>>> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping value by string key.
    pub fn get(&self, key: &str) -> Option<&Node<T>> {
        self.as_mapping()
            .and_then(|entries| entries.get(&Yaml::String(key.to_string())))
    }

    /// Convert to plain YAML if the subtree holds no custom values.
    pub fn into_plain(self) -> Option<Yaml> {
        match self {
            Node::Scalar(yaml) => Some(yaml),
            Node::Sequence(items) => items
                .into_iter()
                .map(Node::into_plain)
                .collect::<Option<Vec<_>>>()
                .map(Yaml::Array),
            Node::Mapping(entries) => entries
                .into_iter()
                .map(|(key, value)| value.into_plain().map(|value| (key, value)))
                .collect::<Option<yaml_rust2::yaml::Hash>>()
                .map(Yaml::Hash),
            Node::Custom(_) => None,
        }
    }

    /// Convert to plain YAML, turning each custom value into YAML with `custom`.
    pub fn into_yaml_with(self, custom: &mut impl FnMut(T) -> Yaml) -> Yaml {
        match self {
            Node::Scalar(yaml) => yaml,
            Node::Sequence(items) => Yaml::Array(
                items
                    .into_iter()
                    .map(|item| item.into_yaml_with(custom))
                    .collect(),
            ),
            Node::Mapping(entries) => Yaml::Hash(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_yaml_with(custom)))
                    .collect(),
            ),
            Node::Custom(value) => custom(value),
        }
    }
}

impl Node<Infallible> {
    /// Convert a tree parsed without custom tags to plain YAML.
    pub fn into_yaml(self) -> Yaml {
        self.into_yaml_with(&mut |never| match never {})
    }
}

impl<T> From<Yaml> for Node<T> {
    fn from(yaml: Yaml) -> Self {
        match yaml {
            Yaml::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Yaml::Hash(hash) => Node::Mapping(
                hash.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
            other => Node::Scalar(other),
        }
    }
}
