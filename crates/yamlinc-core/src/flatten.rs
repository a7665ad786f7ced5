//! Replaces include sites with the documents they refer to.

use crate::include::{IncludeNode, RawNode};
use yamlinc_yaml::{Node, Yaml};

/// Remove every include site from a parsed tree.
///
/// - An include in a sequence whose contents is a sequence is spliced into
///   the parent when `should_merge` is set, and nested as one item otherwise.
/// - Every other include is replaced by its contents. In particular a
///   `merge:` include of a mapping or scalar is simply nested.
/// - Mapping keys are left as they are; values keep their order.
///
/// Include contents are already fully resolved, so they are copied out of
/// the shared value without further processing.
pub fn flatten(node: RawNode) -> Yaml {
    match node {
        Node::Custom(include) => include_contents(&include),
        Node::Scalar(yaml) => yaml,
        Node::Sequence(items) => Yaml::Array(flatten_sequence(items)),
        Node::Mapping(entries) => Yaml::Hash(
            entries
                .into_iter()
                .map(|(key, value)| (key, flatten(value)))
                .collect(),
        ),
    }
}

fn flatten_sequence(items: Vec<RawNode>) -> Vec<Yaml> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Node::Custom(IncludeNode {
                contents,
                should_merge,
            }) => match contents.as_ref() {
                Yaml::Array(included) if should_merge => out.extend(included.iter().cloned()),
                Yaml::Array(included) => out.push(Yaml::Array(included.clone())),
                other => out.push(other.clone()),
            },
            other => out.push(flatten(other)),
        }
    }
    out
}

fn include_contents(include: &IncludeNode) -> Yaml {
    include.contents.as_ref().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn int(i: i64) -> RawNode {
        Node::Scalar(Yaml::Integer(i))
    }

    fn include(contents: Yaml, should_merge: bool) -> RawNode {
        Node::Custom(IncludeNode {
            contents: Arc::new(contents),
            should_merge,
        })
    }

    fn ints(values: &[i64]) -> Yaml {
        Yaml::Array(values.iter().map(|&i| Yaml::Integer(i)).collect())
    }

    fn string(s: &str) -> Yaml {
        Yaml::String(s.into())
    }

    #[test]
    fn test_nested_include_in_sequence() {
        let node = Node::Sequence(vec![int(1), include(ints(&[2, 3]), false)]);
        assert_eq!(
            flatten(node),
            Yaml::Array(vec![Yaml::Integer(1), ints(&[2, 3])])
        );
    }

    #[test]
    fn test_merged_include_is_spliced() {
        let node = Node::Sequence(vec![int(1), include(ints(&[2, 3]), true), int(4)]);
        assert_eq!(flatten(node), ints(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_merge_of_scalar_falls_back_to_nesting() {
        let node = Node::Sequence(vec![int(1), include(string("solo"), true)]);
        assert_eq!(
            flatten(node),
            Yaml::Array(vec![Yaml::Integer(1), string("solo")])
        );
    }

    #[test]
    fn test_merge_of_mapping_falls_back_to_nesting() {
        let mut hash = yamlinc_yaml::Hash::new();
        hash.insert(string("a"), Yaml::Integer(1));
        let node = Node::Sequence(vec![include(Yaml::Hash(hash.clone()), true)]);
        assert_eq!(flatten(node), Yaml::Array(vec![Yaml::Hash(hash)]));
    }

    #[test]
    fn test_include_as_mapping_value() {
        let entries = [(string("list"), include(ints(&[1, 2]), true))]
            .into_iter()
            .collect();
        let yaml = flatten(Node::Mapping(entries));
        assert_eq!(yaml["list"], ints(&[1, 2]));
    }

    #[test]
    fn test_include_at_root() {
        assert_eq!(flatten(include(ints(&[7]), true)), ints(&[7]));
    }

    #[test]
    fn test_mapping_order_is_preserved() {
        let entries = [
            (string("z"), int(1)),
            (string("a"), include(string("x"), false)),
            (string("m"), int(3)),
        ]
        .into_iter()
        .collect();
        let yaml = flatten(Node::Mapping(entries));
        let keys: Vec<_> = yaml
            .as_hash()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_includes_inside_nested_sequences() {
        let node = Node::Sequence(vec![Node::Sequence(vec![include(ints(&[1, 2]), true)])]);
        assert_eq!(flatten(node), Yaml::Array(vec![ints(&[1, 2])]));
    }
}
