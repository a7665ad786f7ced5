//! YAML parser that builds [`Node`] trees and runs custom tag handlers.

use crate::error::ParseError;
use crate::merge::expand_merge_keys;
use crate::{Error, Node, Result, SourceInfo};
use std::collections::HashMap;
use std::convert::Infallible;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Yaml;

/// Options controlling how text is parsed.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name reported in source locations
    pub filename: Option<String>,

    /// Expand `<<` merge keys (default: true)
    pub merge_keys: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filename: None,
            merge_keys: true,
        }
    }
}

impl ParseOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_merge_keys(mut self, merge_keys: bool) -> Self {
        self.merge_keys = merge_keys;
        self
    }
}

/// A parser extension owning one local tag (e.g. `!include`).
///
/// Whenever a scalar carrying the tag is parsed, [`TagHandler::resolve`] is
/// called with the scalar's text, before the rest of the document is parsed.
/// The produced value lands in the tree as [`Node::Custom`].
pub trait TagHandler {
    type Output: Clone;
    type Error;

    /// Tag name without the leading `!`.
    fn tag(&self) -> &str;

    /// Whether a tag, as reported by the scanner, belongs to this handler.
    fn handles(&self, handle: &str, suffix: &str) -> bool {
        (handle == "!" || handle.is_empty()) && suffix == self.tag()
    }

    fn resolve(
        &mut self,
        payload: &str,
        location: &SourceInfo,
    ) -> std::result::Result<Self::Output, Self::Error>;
}

/// Handler set with no custom tags. Every tag parses as plain YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomTags;

impl TagHandler for NoCustomTags {
    type Output = Infallible;
    type Error = Infallible;

    fn tag(&self) -> &str {
        ""
    }

    fn handles(&self, _handle: &str, _suffix: &str) -> bool {
        false
    }

    fn resolve(
        &mut self,
        _payload: &str,
        _location: &SourceInfo,
    ) -> std::result::Result<Infallible, Infallible> {
        unreachable!("NoCustomTags never claims a tag")
    }
}

/// Parse YAML text into plain YAML.
///
/// The text must hold at most one document; a second `---` document is a
/// syntax error. Empty input parses to `Yaml::Null`.
///
/// # Example
///
/// ```rust
/// use yamlinc_yaml::{ParseOptions, parse};
///
/// let text = "base: &base {a: 1}\nderived:\n  <<: *base\n  b: 2";
/// let yaml = parse(text, &ParseOptions::default()).unwrap();
/// assert_eq!(yaml["derived"]["a"].as_i64(), Some(1));
/// ```
pub fn parse(content: &str, options: &ParseOptions) -> Result<Yaml> {
    match parse_with_tags(content, options, &mut NoCustomTags) {
        Ok(node) => Ok(node.into_yaml()),
        Err(ParseError::Yaml(err)) => Err(err),
        Err(ParseError::Handler(never)) => match never {},
    }
}

/// Parse YAML text, handing scalars with the handler's tag to `handler`.
///
/// # Errors
///
/// Returns [`ParseError::Handler`] with the first error the handler raised,
/// or [`ParseError::Yaml`] if the text is not valid YAML. Once an error is
/// raised no further handler calls are made.
pub fn parse_with_tags<H: TagHandler>(
    content: &str,
    options: &ParseOptions,
    handler: &mut H,
) -> std::result::Result<Node<H::Output>, ParseError<H::Error>> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(options, handler);

    // Load every document so that a second one can be reported
    let loaded = parser.load(&mut builder, true);

    if let Some(err) = builder.error {
        return Err(err);
    }
    loaded.map_err(|err| Error::from_scan(&err, options.filename.as_deref()))?;

    Ok(builder.root.unwrap_or(Node::Scalar(Yaml::Null)))
}

/// Receives parser events and assembles the tree.
struct TreeBuilder<'a, H: TagHandler> {
    options: &'a ParseOptions,
    handler: &'a mut H,

    /// Collections still open, innermost last
    stack: Vec<BuildNode<H::Output>>,

    /// Completed anchored nodes by anchor id
    anchors: HashMap<usize, Node<H::Output>>,

    root: Option<Node<H::Output>>,

    /// Documents started so far
    documents: usize,

    /// First failure; later events are ignored once set
    error: Option<ParseError<H::Error>>,
}

enum BuildNode<T> {
    Sequence {
        anchor: usize,
        items: Vec<Node<T>>,
    },
    Mapping {
        anchor: usize,
        start: SourceInfo,
        entries: Vec<(Node<T>, Option<Node<T>>)>,
    },
}

impl<'a, H: TagHandler> TreeBuilder<'a, H> {
    fn new(options: &'a ParseOptions, handler: &'a mut H) -> Self {
        Self {
            options,
            handler,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            documents: 0,
            error: None,
        }
    }

    fn location(&self, marker: &Marker) -> SourceInfo {
        SourceInfo::from_marker(marker, self.options.filename.as_deref())
    }

    fn owns(&self, tag: &Tag) -> bool {
        self.handler.handles(&tag.handle, &tag.suffix)
    }

    /// True when the next completed node becomes a mapping key.
    fn expecting_key(&self) -> bool {
        match self.stack.last() {
            Some(BuildNode::Mapping { entries, .. }) => {
                entries.last().is_none_or(|(_, value)| value.is_some())
            }
            _ => false,
        }
    }

    fn handle_event(
        &mut self,
        ev: Event,
        marker: &Marker,
    ) -> std::result::Result<(), ParseError<H::Error>> {
        match ev {
            Event::Scalar(value, style, anchor, tag) => {
                let node = match tag {
                    Some(tag) if self.owns(&tag) => {
                        let location = self.location(marker);
                        if self.expecting_key() {
                            return Err(self.misplaced(
                                &tag,
                                "cannot be used as a mapping key",
                                location,
                            ));
                        }
                        let output = self
                            .handler
                            .resolve(&value, &location)
                            .map_err(ParseError::Handler)?;
                        Node::Custom(output)
                    }
                    tag => {
                        let Some(yaml) = scalar_value(&value, style, tag.as_ref()) else {
                            return Err(ParseError::Yaml(Error::InvalidScalar {
                                tag: tag.map(|tag| tag.suffix).unwrap_or_default(),
                                value,
                                location: self.location(marker),
                            }));
                        };
                        Node::Scalar(yaml)
                    }
                };
                self.complete(node, anchor);
            }

            Event::SequenceStart(anchor, tag) => {
                self.reject_collection_tag(tag.as_ref(), marker)?;
                self.stack.push(BuildNode::Sequence {
                    anchor,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                let build_node = self.stack.pop().expect("SequenceEnd without SequenceStart");
                let BuildNode::Sequence { anchor, items } = build_node else {
                    panic!("Expected Sequence build node");
                };
                self.complete(Node::Sequence(items), anchor);
            }

            Event::MappingStart(anchor, tag) => {
                self.reject_collection_tag(tag.as_ref(), marker)?;
                let start = self.location(marker);
                self.stack.push(BuildNode::Mapping {
                    anchor,
                    start,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => {
                let build_node = self.stack.pop().expect("MappingEnd without MappingStart");
                let BuildNode::Mapping {
                    anchor,
                    start,
                    entries,
                } = build_node
                else {
                    panic!("Expected Mapping build node");
                };
                let node = self.finish_mapping(entries, &start)?;
                self.complete(node, anchor);
            }

            Event::Alias(anchor) => {
                let node = self.anchors.get(&anchor).cloned().ok_or_else(|| {
                    Error::UnknownAnchor {
                        location: self.location(marker),
                    }
                })?;
                self.push_complete(node);
            }

            Event::DocumentStart => {
                self.documents += 1;
                if self.documents > 1 {
                    return Err(ParseError::Yaml(Error::Syntax {
                        message: "multiple documents in stream (only one is allowed)".into(),
                        location: self.location(marker),
                    }));
                }
            }

            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentEnd => {}
        }
        Ok(())
    }

    fn misplaced(&self, tag: &Tag, message: &str, location: SourceInfo) -> ParseError<H::Error> {
        ParseError::Yaml(Error::MisplacedTag {
            tag: tag.suffix.clone(),
            message: message.to_string(),
            location,
        })
    }

    fn reject_collection_tag(
        &self,
        tag: Option<&Tag>,
        marker: &Marker,
    ) -> std::result::Result<(), ParseError<H::Error>> {
        match tag {
            Some(tag) if self.owns(tag) => Err(self.misplaced(
                tag,
                "must be applied to a scalar",
                self.location(marker),
            )),
            _ => Ok(()),
        }
    }

    fn finish_mapping(
        &self,
        entries: Vec<(Node<H::Output>, Option<Node<H::Output>>)>,
        start: &SourceInfo,
    ) -> std::result::Result<Node<H::Output>, ParseError<H::Error>> {
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = key.into_plain().ok_or_else(|| {
                ParseError::Yaml(Error::MisplacedTag {
                    tag: self.handler.tag().to_string(),
                    message: "cannot be used inside a mapping key".into(),
                    location: start.clone(),
                })
            })?;
            pairs.push((key, value.unwrap_or(Node::Scalar(Yaml::Null))));
        }

        if self.options.merge_keys {
            Ok(expand_merge_keys(pairs, start)?)
        } else {
            Ok(Node::Mapping(pairs.into_iter().collect()))
        }
    }

    fn complete(&mut self, node: Node<H::Output>, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }
        self.push_complete(node);
    }

    fn push_complete(&mut self, node: Node<H::Output>) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => match entries.last_mut() {
                Some((_, value @ None)) => *value = Some(node),
                _ => entries.push((node, None)),
            },
        }
    }
}

impl<H: TagHandler> MarkedEventReceiver for TreeBuilder<'_, H> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle_event(ev, &marker) {
            self.error = Some(err);
        }
    }
}

/// Handle of the YAML core schema once the scanner has expanded `!!`.
const CORE_SCHEMA_HANDLE: &str = "tag:yaml.org,2002:";

/// Type a scalar the way the YAML 1.2 core schema does.
///
/// Untagged plain scalars are inferred; quoted and block scalars are strings.
/// A core-schema tag (`!!str`, `!!int`, `!!float`, `!!bool`, `!!null`)
/// forces the type whatever the style. Returns `None` when the text is not a
/// valid value of the tagged type.
fn scalar_value(value: &str, style: TScalarStyle, tag: Option<&Tag>) -> Option<Yaml> {
    let core_suffix = tag
        .filter(|tag| tag.handle == CORE_SCHEMA_HANDLE || tag.handle == "!!")
        .map(|tag| tag.suffix.as_str());

    match core_suffix {
        Some("str") => Some(Yaml::String(value.to_string())),
        Some("null") => match value {
            "" | "~" | "null" | "Null" | "NULL" => Some(Yaml::Null),
            _ => None,
        },
        Some("bool") => match value {
            "true" | "True" | "TRUE" => Some(Yaml::Boolean(true)),
            "false" | "False" | "FALSE" => Some(Yaml::Boolean(false)),
            _ => None,
        },
        Some("int") => match Yaml::from_str(value) {
            int @ Yaml::Integer(_) => Some(int),
            _ => None,
        },
        Some("float") => match Yaml::from_str(value) {
            real @ Yaml::Real(_) => Some(real),
            // Written with a fraction so the value stays a float when re-read
            Yaml::Integer(i) => Some(Yaml::Real(format!("{:?}", i as f64))),
            _ => None,
        },
        _ if matches!(style, TScalarStyle::Plain) => Some(Yaml::from_str(value)),
        _ => Some(Yaml::String(value.to_string())),
    }
}
