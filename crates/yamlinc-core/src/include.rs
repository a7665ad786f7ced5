//! The `!include` directive.
//!
//! ```yaml
//! plugins:
//!   - core
//!   - !include merge:extra-plugins.yaml   # items spliced into this list
//! settings: !include settings.yaml       # whole document nested here
//! ```
//!
//! The payload is a path relative to the directory of the document that
//! contains the directive. A `merge:` prefix asks for the included sequence to
//! be spliced into the surrounding sequence instead of nested as one item.

use crate::{DocumentId, ResolveError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use yamlinc_yaml::{Node, SourceInfo, TagHandler, Yaml};

/// Tag name of the include directive (`!include`).
pub const INCLUDE_TAG: &str = "include";

/// Payload prefix requesting sequence splicing.
pub const MERGE_PREFIX: &str = "merge:";

/// An include site after the referenced document has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    /// Fully resolved contents of the included document
    pub contents: Arc<Yaml>,

    /// Splice sequence contents into the parent sequence
    pub should_merge: bool,
}

/// Parsed document tree that may still contain include sites.
pub type RawNode = Node<IncludeNode>;

/// The parts of an include payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeDirective<'a> {
    /// Path as written, relative to the including document
    pub path: &'a str,
    pub should_merge: bool,
}

impl<'a> IncludeDirective<'a> {
    pub fn parse(payload: &'a str) -> Self {
        match payload.strip_prefix(MERGE_PREFIX) {
            Some(rest) => Self {
                path: rest.trim(),
                should_merge: true,
            },
            None => Self {
                path: payload.trim(),
                should_merge: false,
            },
        }
    }
}

/// Resolves a document by path on behalf of an include site.
///
/// Implemented by [`Resolver`](crate::Resolver); the tag handler only sees
/// this trait so it can be exercised with a stand-in.
pub trait DocumentResolver {
    fn resolve_document(&mut self, path: &Path) -> Result<Arc<Yaml>>;
}

/// Tag handler for `!include`, bound to the document being parsed.
///
/// A new handler is built for every parse, because include paths are
/// relative to the including document rather than to the root document.
pub struct IncludeTag<'r> {
    document: DocumentId,
    base_dir: PathBuf,
    resolver: &'r mut dyn DocumentResolver,
}

impl<'r> IncludeTag<'r> {
    pub fn new(document: &DocumentId, resolver: &'r mut dyn DocumentResolver) -> Self {
        Self {
            document: document.clone(),
            base_dir: document.directory().to_path_buf(),
            resolver,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl TagHandler for IncludeTag<'_> {
    type Output = IncludeNode;
    type Error = ResolveError;

    fn tag(&self) -> &str {
        INCLUDE_TAG
    }

    fn resolve(&mut self, payload: &str, location: &SourceInfo) -> Result<IncludeNode> {
        let directive = IncludeDirective::parse(payload);
        if directive.path.is_empty() {
            return Err(ResolveError::InvalidDirective {
                document: self.document.clone(),
                message: "include path is empty".into(),
                location: location.clone(),
            });
        }

        let target = self.base_dir.join(directive.path);
        debug!(
            from = %self.document,
            target = %target.display(),
            merge = directive.should_merge,
            "Resolving include"
        );

        let contents = self.resolver.resolve_document(&target)?;
        Ok(IncludeNode {
            contents,
            should_merge: directive.should_merge,
        })
    }
}
