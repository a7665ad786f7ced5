//! Source locations for parsed YAML nodes and parse errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use yaml_rust2::scanner::Marker;

/// Position of a YAML element in the text it was parsed from.
///
/// Lines and columns are 1-based so they can be shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Document the text came from, when known
    pub file: Option<String>,

    /// Byte offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub col: usize,
}

impl SourceInfo {
    pub fn new(file: Option<String>, offset: usize, line: usize, col: usize) -> Self {
        Self {
            file,
            offset,
            line,
            col,
        }
    }

    /// Location of a yaml-rust2 scanner marker.
    pub fn from_marker(marker: &Marker, file: Option<&str>) -> Self {
        Self {
            file: file.map(str::to_string),
            offset: marker.index(),
            // yaml-rust2 lines are 1-based, columns 0-based
            line: marker.line().max(1),
            col: marker.col() + 1,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "line {}, column {}", self.line, self.col),
        }
    }
}
