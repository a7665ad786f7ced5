//! # yamlinc-yaml
//!
//! YAML parsing and emitting for the include resolver.
//!
//! Parsing goes through `yaml-rust2`'s event parser and builds a [`Node`]
//! tree. Two things are layered on top of plain YAML loading:
//!
//! - **Custom tags**: a [`TagHandler`] owns one local tag (such as
//!   `!include`) and turns each tagged scalar into a value of its own type
//!   while the document is being parsed.
//! - **Merge keys**: `<<` entries are expanded when a mapping closes, if
//!   [`ParseOptions::merge_keys`] is set. Expansion only ever sees merge keys
//!   written in the text being parsed.
//!
//! [`stringify`] writes canonical YAML: unwrapped lines, no anchors, no
//! document marker.
//!
//! ## Example
//!
//! ```rust
//! use yamlinc_yaml::{ParseOptions, parse, stringify};
//!
//! let text = "defaults: &d {retries: 3}\njob:\n  <<: *d\n  name: build";
//! let yaml = parse(text, &ParseOptions::default()).unwrap();
//! assert_eq!(yaml["job"]["retries"].as_i64(), Some(3));
//!
//! let text = stringify(&yaml).unwrap();
//! assert!(!text.starts_with("---"));
//! ```

mod emit;
mod error;
mod merge;
mod node;
mod parser;
mod source_info;

pub use emit::stringify;
pub use error::{Error, ParseError, Result};
pub use merge::MERGE_KEY;
pub use node::Node;
pub use parser::{NoCustomTags, ParseOptions, TagHandler, parse, parse_with_tags};
pub use source_info::SourceInfo;

// Re-exported so callers do not need their own yaml-rust2 dependency.
pub use yaml_rust2::yaml::Hash;
pub use yaml_rust2::Yaml;
