//! Error types for include resolution.

use crate::DocumentId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use yamlinc_yaml::SourceInfo;

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that abort a resolution.
///
/// An error raised while resolving an included document reaches the caller
/// unchanged; it is never rewrapped as an error of the including document.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A document includes itself, directly or through other documents.
    #[error("Circular reference: {document} (include chain: {})", display_chain(.chain, .document))]
    CircularReference {
        /// Document requested while it was still being resolved
        document: DocumentId,
        /// Documents in progress when the cycle was found, outermost first
        chain: Vec<DocumentId>,
    },

    /// Document text is not valid YAML, or a tag or merge key is misused.
    #[error("Failed to parse {document}: {source}")]
    Parse {
        document: DocumentId,
        #[source]
        source: yamlinc_yaml::Error,
    },

    /// An `!include` payload that does not name a document.
    #[error("Invalid include in {document} at {location}: {message}")]
    InvalidDirective {
        document: DocumentId,
        message: String,
        location: SourceInfo,
    },

    /// The source provider could not supply a document's text.
    #[error("Cannot read {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Include chain is deeper than `ResolveOptions::max_depth`.
    #[error("Include depth exceeded (max depth: {max_depth}) at {document}")]
    IncludeDepthExceeded {
        max_depth: usize,
        document: DocumentId,
    },

    /// The flattened document could not be written as YAML.
    #[error("Failed to serialize {document}: {source}")]
    Serialize {
        document: DocumentId,
        #[source]
        source: yamlinc_yaml::Error,
    },

    /// `transform` could not write its output file.
    #[error("Cannot write {}: {source}", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_chain(chain: &[DocumentId], document: &DocumentId) -> String {
    chain
        .iter()
        .chain(std::iter::once(document))
        .map(DocumentId::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_reference_message() {
        let err = ResolveError::CircularReference {
            document: DocumentId::new("/docs/a.yaml"),
            chain: vec![DocumentId::new("/docs/a.yaml"), DocumentId::new("/docs/b.yaml")],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"Circular reference: /docs/a.yaml (include chain: /docs/a.yaml -> /docs/b.yaml -> /docs/a.yaml)"
        );
    }

    #[test]
    fn test_source_unavailable_message() {
        let err = ResolveError::SourceUnavailable {
            path: PathBuf::from("/docs/missing.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        insta::assert_snapshot!(err.to_string(), @"Cannot read /docs/missing.yaml: not found");
    }

    #[test]
    fn test_depth_exceeded_message() {
        let err = ResolveError::IncludeDepthExceeded {
            max_depth: 2,
            document: DocumentId::new("/docs/deep.yaml"),
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"Include depth exceeded (max depth: 2) at /docs/deep.yaml"
        );
    }
}
