/*
 * resolver.rs
 *
 * Resolution orchestrator.
 *
 * A document is resolved in four steps:
 * 1. parse with the include tag handler and without merge keys; every
 *    include is resolved depth-first before the parse finishes
 * 2. flatten away the include sites
 * 3. serialize the flattened tree
 * 4. parse the text again with merge keys enabled
 *
 * Step 4 is what lets `<<: !include base.yaml` work: the merge key only
 * becomes expandable once the included mapping is part of the text.
 */

use crate::flatten::flatten;
use crate::include::{DocumentResolver, IncludeTag};
use crate::{DocumentId, ResolveError, Result, SourceProvider};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use yamlinc_yaml::{ParseError, ParseOptions, Yaml, parse, parse_with_tags, stringify};

/// Caller policy for a resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Maximum include depth; the document passed in is depth 0.
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl ResolveOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Resolved documents and the chain of documents being resolved.
///
/// Entries are never invalidated. Reuse a cache across resolvers with
/// [`Resolver::with_cache`] and [`Resolver::into_cache`].
#[derive(Debug, Default)]
pub struct ResolveCache {
    resolved: HashMap<DocumentId, Arc<Yaml>>,
    in_progress: IndexSet<DocumentId>,
}

impl ResolveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, document: &DocumentId) -> Option<&Arc<Yaml>> {
        self.resolved.get(document)
    }

    pub fn contains(&self, document: &DocumentId) -> bool {
        self.resolved.contains_key(document)
    }

    /// Number of resolved documents.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Documents currently being resolved, outermost first.
    pub fn in_progress(&self) -> impl Iterator<Item = &DocumentId> {
        self.in_progress.iter()
    }
}

/// Output of [`Resolver::transform`].
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub resolved: Arc<Yaml>,
    /// Canonical text written to the output path
    pub serialized: String,
}

/// Resolves documents containing `!include` directives.
///
/// # Example
///
/// ```rust
/// use yamlinc_core::{MemorySource, Resolver};
///
/// let source = MemorySource::new()
///     .with_file("/base.yaml", "retries: 3\ntimeout: 10\n")
///     .with_file("/job.yaml", "<<: !include base.yaml\ntimeout: 30\n");
///
/// let mut resolver = Resolver::new(source);
/// let job = resolver.resolve_file("/job.yaml").unwrap();
/// assert_eq!(job["retries"].as_i64(), Some(3));
/// assert_eq!(job["timeout"].as_i64(), Some(30));
/// ```
pub struct Resolver<S> {
    source: S,
    options: ResolveOptions,
    cache: ResolveCache,
}

impl<S: SourceProvider> Resolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ResolveOptions::default(),
            cache: ResolveCache::new(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Start from previously resolved documents.
    pub fn with_cache(mut self, cache: ResolveCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn into_cache(self) -> ResolveCache {
        self.cache
    }

    pub fn cache(&self) -> &ResolveCache {
        &self.cache
    }

    /// Read and resolve a document.
    ///
    /// A document already in the cache is returned without being read.
    pub fn resolve_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<Yaml>> {
        let document = self.document_id(path.as_ref())?;
        self.resolve_document_id(document, None)
    }

    /// Resolve `contents` as the document at `path`.
    ///
    /// `path` is the document's identity: relative includes resolve against
    /// its directory and the result is cached under it. If `path` is already
    /// cached, the cached value is returned and `contents` is ignored.
    pub fn resolve_text(&mut self, contents: &str, path: impl AsRef<Path>) -> Result<Arc<Yaml>> {
        let document = self.document_id(path.as_ref())?;
        self.resolve_document_id(document, Some(contents))
    }

    /// Resolve `input` and write its canonical form to `output`.
    pub fn transform(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<TransformResult> {
        let document = self.document_id(input.as_ref())?;
        let resolved = self.resolve_document_id(document.clone(), None)?;
        let serialized =
            stringify(&resolved).map_err(|source| ResolveError::Serialize { document, source })?;

        let output = output.as_ref();
        let target = self
            .source
            .canonicalize(output)
            .and_then(|target| {
                self.source.write_output(&target, &serialized)?;
                Ok(target)
            })
            .map_err(|source| ResolveError::OutputUnwritable {
                path: output.to_path_buf(),
                source,
            })?;
        info!(output = %target.display(), "Wrote resolved document");

        Ok(TransformResult {
            resolved,
            serialized,
        })
    }

    fn document_id(&self, path: &Path) -> Result<DocumentId> {
        self.source
            .canonicalize(path)
            .map(DocumentId::new)
            .map_err(|source| ResolveError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })
    }

    fn resolve_document_id(
        &mut self,
        document: DocumentId,
        contents: Option<&str>,
    ) -> Result<Arc<Yaml>> {
        if let Some(cached) = self.cache.get(&document) {
            debug!(document = %document, "Cache hit");
            return Ok(Arc::clone(cached));
        }

        self.enter(&document)?;
        let result = match contents {
            Some(text) => self.load(&document, text),
            None => self
                .read(&document)
                .and_then(|text| self.load(&document, &text)),
        };
        self.cache.in_progress.shift_remove(&document);

        let resolved = result?;
        self.cache
            .resolved
            .insert(document, Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Mark a document as in progress, rejecting cycles and over-deep chains.
    fn enter(&mut self, document: &DocumentId) -> Result<()> {
        if self.cache.in_progress.contains(document) {
            return Err(ResolveError::CircularReference {
                document: document.clone(),
                chain: self.cache.in_progress.iter().cloned().collect(),
            });
        }
        if let Some(max_depth) = self.options.max_depth {
            if self.cache.in_progress.len() > max_depth {
                return Err(ResolveError::IncludeDepthExceeded {
                    max_depth,
                    document: document.clone(),
                });
            }
        }
        self.cache.in_progress.insert(document.clone());
        Ok(())
    }

    fn read(&self, document: &DocumentId) -> Result<String> {
        self.source
            .read_source(document.path())
            .map_err(|source| ResolveError::SourceUnavailable {
                path: document.path().to_path_buf(),
                source,
            })
    }

    fn load(&mut self, document: &DocumentId, text: &str) -> Result<Arc<Yaml>> {
        let filename = document.to_string();
        debug!(
            document = %document,
            depth = self.cache.in_progress.len() - 1,
            "Resolving document"
        );

        let raw = {
            let options = ParseOptions::default()
                .with_filename(filename.clone())
                .with_merge_keys(false);
            let mut tag = IncludeTag::new(document, self);
            parse_with_tags(text, &options, &mut tag).map_err(|err| match err {
                ParseError::Yaml(source) => ResolveError::Parse {
                    document: document.clone(),
                    source,
                },
                ParseError::Handler(nested) => nested,
            })?
        };

        let flattened = flatten(raw);
        let serialized = stringify(&flattened).map_err(|source| ResolveError::Serialize {
            document: document.clone(),
            source,
        })?;

        let resolved = parse(&serialized, &ParseOptions::default().with_filename(filename))
            .map_err(|source| ResolveError::Parse {
                document: document.clone(),
                source,
            })?;
        debug!(document = %document, "Resolved document");

        Ok(Arc::new(resolved))
    }
}

impl<S: SourceProvider> DocumentResolver for Resolver<S> {
    fn resolve_document(&mut self, path: &Path) -> Result<Arc<Yaml>> {
        self.resolve_file(path)
    }
}
