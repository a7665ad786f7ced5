//! `<<` merge-key expansion.
//!
//! Applied while a mapping is being closed, so it only sees merge keys that
//! are present in the text being parsed.

use crate::{Error, Node, SourceInfo};
use indexmap::IndexMap;
use std::collections::HashSet;
use yaml_rust2::Yaml;

pub const MERGE_KEY: &str = "<<";

pub(crate) fn is_merge_key(key: &Yaml) -> bool {
    key.as_str() == Some(MERGE_KEY)
}

/// Build a mapping from its raw entries, expanding every `<<` entry.
///
/// Keys written in the mapping itself always win over merged keys. When the
/// merge value is a sequence of mappings, earlier mappings win over later
/// ones. Merged entries are placed where the `<<` key appeared.
pub(crate) fn expand_merge_keys<T>(
    pairs: Vec<(Yaml, Node<T>)>,
    location: &SourceInfo,
) -> Result<Node<T>, Error> {
    if !pairs.iter().any(|(key, _)| is_merge_key(key)) {
        return Ok(Node::Mapping(pairs.into_iter().collect()));
    }

    let explicit: HashSet<Yaml> = pairs
        .iter()
        .filter(|(key, _)| !is_merge_key(key))
        .map(|(key, _)| key.clone())
        .collect();

    let mut merged = IndexMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        if !is_merge_key(&key) {
            merged.insert(key, value);
            continue;
        }
        for source in merge_sources(value, location)? {
            for (source_key, source_value) in source {
                if !explicit.contains(&source_key) && !merged.contains_key(&source_key) {
                    merged.insert(source_key, source_value);
                }
            }
        }
    }

    Ok(Node::Mapping(merged))
}

fn merge_sources<T>(
    value: Node<T>,
    location: &SourceInfo,
) -> Result<Vec<IndexMap<Yaml, Node<T>>>, Error> {
    match value {
        Node::Mapping(entries) => Ok(vec![entries]),
        Node::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Mapping(entries) => Ok(entries),
                _ => Err(Error::InvalidMerge {
                    message: "every item of a merged sequence must be a mapping".into(),
                    location: location.clone(),
                }),
            })
            .collect(),
        _ => Err(Error::InvalidMerge {
            message: "value must be a mapping or a sequence of mappings".into(),
            location: location.clone(),
        }),
    }
}
