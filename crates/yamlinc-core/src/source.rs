/*
 * source.rs
 *
 * Where document text comes from and where resolved output goes.
 *
 * The resolver never touches the filesystem directly; it asks a
 * SourceProvider. Two providers ship with the crate:
 * - FileSystemSource: reads and writes real files
 * - MemorySource: an in-memory virtual filesystem for embedding and tests
 */

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Capability to read documents, write output, and name documents canonically.
pub trait SourceProvider {
    /// Read the full text of a document.
    ///
    /// Fails with `io::ErrorKind::NotFound` when the document does not exist.
    fn read_source(&self, path: &Path) -> io::Result<String>;

    /// Write text to a path, creating or overwriting it.
    fn write_output(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Absolute, normalized form of `path`, used as the document's identity.
    ///
    /// Relative paths are taken relative to the provider's root. `.` and `..`
    /// components are removed lexically; symlinks are not followed.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

impl<S: SourceProvider + ?Sized> SourceProvider for &S {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        (**self).read_source(path)
    }

    fn write_output(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write_output(path, contents)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }
}

/// Native filesystem access.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Provider rooted at the process working directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            root: std::env::current_dir()?,
        })
    }

    /// Provider that resolves relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for FileSystemSource {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_output(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(normalize_path(&self.root, path))
    }
}

/// In-memory virtual filesystem.
///
/// Counts successful reads so callers can check that cached documents are
/// not read again.
#[derive(Debug)]
pub struct MemorySource {
    root: PathBuf,
    files: RwLock<HashMap<PathBuf, String>>,
    reads: AtomicUsize,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// Empty filesystem rooted at `/`.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
            files: RwLock::new(HashMap::new()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Add a file, builder style.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = normalize_path(&self.root, path.as_ref());
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, contents.into());
    }

    /// Current contents of a file.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = normalize_path(&self.root, path.as_ref());
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&path)
            .cloned()
    }

    /// Number of successful `read_source` calls so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl SourceProvider for MemorySource {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        let contents = self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(contents)
    }

    fn write_output(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.insert(path, contents);
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(normalize_path(&self.root, path))
    }
}

/// Join `path` onto `base` and remove `.` and `..` components.
///
/// An absolute `path` replaces `base`. `..` at the root stays at the root.
pub(crate) fn normalize_path(base: &Path, path: &Path) -> PathBuf {
    let joined = base.join(path);
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    normalized
}
