//! Command implementations for the yamlinc CLI
//!
//! Each command module handles the CLI interface and delegates to
//! yamlinc-core for the actual resolution.

pub mod resolve;
pub mod transform;

use anyhow::{Context, Result};
use yamlinc_core::{FileSystemSource, ResolveOptions, Resolver};

/// Filesystem resolver rooted at the working directory.
pub(crate) fn resolver(max_depth: Option<usize>) -> Result<Resolver<FileSystemSource>> {
    let source = FileSystemSource::new().context("Failed to get current directory")?;
    Ok(Resolver::new(source).with_options(ResolveOptions { max_depth }))
}
