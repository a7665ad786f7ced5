//! # yamlinc-core
//!
//! Include resolution for YAML documents.
//!
//! A document may pull in other documents with the `!include` tag:
//!
//! ```yaml
//! # pipeline.yaml
//! <<: !include defaults.yaml       # merge keys work across includes
//! steps:
//!   - checkout
//!   - !include merge:steps.yaml    # splice a list into this list
//! notify: !include notify.yaml     # nest a whole document
//! ```
//!
//! Paths are relative to the including document. Every document is resolved
//! at most once per [`ResolveCache`]; a document that includes itself, directly
//! or through others, fails with [`ResolveError::CircularReference`].
//!
//! ## Example
//!
//! ```rust
//! use yamlinc_core::{MemorySource, Resolver};
//!
//! let source = MemorySource::new()
//!     .with_file("/ci/steps.yaml", "- test\n- deploy\n")
//!     .with_file("/ci/main.yaml", "steps:\n  - build\n  - !include merge:steps.yaml\n");
//!
//! let mut resolver = Resolver::new(source);
//! let main = resolver.resolve_file("/ci/main.yaml").unwrap();
//! assert_eq!(main["steps"][2].as_str(), Some("deploy"));
//! ```

mod document;
mod error;
mod flatten;
mod include;
mod resolver;
mod source;

pub use document::DocumentId;
pub use error::{ResolveError, Result};
pub use flatten::flatten;
pub use include::{
    DocumentResolver, IncludeDirective, IncludeNode, IncludeTag, RawNode, INCLUDE_TAG, MERGE_PREFIX,
};
pub use resolver::{ResolveCache, ResolveOptions, Resolver, TransformResult};
pub use source::{FileSystemSource, MemorySource, SourceProvider};

pub use yamlinc_yaml::Yaml;

use std::path::Path;
use std::sync::Arc;

/// Resolve a file with a fresh filesystem resolver.
///
/// Relative paths are taken from the current working directory.
pub fn resolve_file(path: impl AsRef<Path>) -> Result<Arc<Yaml>> {
    file_system_resolver(path.as_ref())?.resolve_file(path)
}

/// Resolve `contents` as if read from `path`, with a fresh filesystem resolver.
pub fn resolve_text(contents: &str, path: impl AsRef<Path>) -> Result<Arc<Yaml>> {
    file_system_resolver(path.as_ref())?.resolve_text(contents, path)
}

/// Resolve `input` and write the result to `output`, with a fresh filesystem
/// resolver.
pub fn transform_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<TransformResult> {
    file_system_resolver(input.as_ref())?.transform(input, output)
}

fn file_system_resolver(path: &Path) -> Result<Resolver<FileSystemSource>> {
    let source = FileSystemSource::new().map_err(|source| ResolveError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Resolver::new(source))
}
