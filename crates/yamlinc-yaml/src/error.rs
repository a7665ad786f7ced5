//! Error types for YAML parsing and emitting.

use crate::SourceInfo;
use thiserror::Error;

/// Result type alias for yamlinc-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or emitting YAML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("{message} at {location}")]
    Syntax {
        message: String,
        location: SourceInfo,
    },

    /// A `<<` merge key whose value is neither a mapping nor a sequence of mappings
    #[error("Invalid merge key at {location}: {message}")]
    InvalidMerge {
        message: String,
        location: SourceInfo,
    },

    /// A custom tag used somewhere its handler cannot produce a value
    #[error("Tag '!{tag}' at {location} {message}")]
    MisplacedTag {
        tag: String,
        message: String,
        location: SourceInfo,
    },

    /// A scalar whose text is not a value of its core-schema tag (`!!int five`)
    #[error("Value '{value}' at {location} is not a valid !!{tag}")]
    InvalidScalar {
        tag: String,
        value: String,
        location: SourceInfo,
    },

    /// An alias referring to an anchor that was never defined
    #[error("Unknown anchor at {location}")]
    UnknownAnchor { location: SourceInfo },

    /// The emitter rejected a value
    #[error("Failed to emit YAML: {0}")]
    Emit(String),
}

/// Failure of a parse that runs custom tag handlers.
///
/// Keeps handler errors apart from YAML errors so callers receive the
/// handler's error type unchanged.
#[derive(Debug)]
pub enum ParseError<E> {
    /// The text itself is not valid YAML
    Yaml(Error),

    /// A tag handler failed
    Handler(E),
}

impl<E> From<Error> for ParseError<E> {
    fn from(err: Error) -> Self {
        ParseError::Yaml(err)
    }
}

impl Error {
    pub(crate) fn from_scan(err: &yaml_rust2::ScanError, file: Option<&str>) -> Self {
        Error::Syntax {
            message: err.info().to_string(),
            location: SourceInfo::from_marker(err.marker(), file),
        }
    }
}
