//! Document identity used for caching and cycle detection.

use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical identity of a document: its normalized absolute path.
///
/// Built by a [`SourceProvider`](crate::SourceProvider) so that every
/// spelling of the same file (`a/../b.yaml`, `./b.yaml`) maps to one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(PathBuf);

impl DocumentId {
    /// Wrap a path that is already canonical.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory that relative includes inside this document resolve against.
    pub fn directory(&self) -> &Path {
        self.0.parent().unwrap_or(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for DocumentId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory() {
        let id = DocumentId::new("/project/config/main.yaml");
        assert_eq!(id.directory(), Path::new("/project/config"));
    }

    #[test]
    fn test_directory_of_root() {
        let id = DocumentId::new("/");
        assert_eq!(id.directory(), Path::new("/"));
    }
}
