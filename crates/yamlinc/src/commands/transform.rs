//! Transform command implementation

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

/// Arguments for the transform command
#[derive(Debug)]
pub struct TransformArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_depth: Option<usize>,
}

/// Execute the transform command
pub fn execute(args: TransformArgs) -> Result<()> {
    let mut resolver = super::resolver(args.max_depth)?;
    let result = resolver.transform(&args.input, &args.output)?;

    info!(
        input = %args.input.display(),
        documents = resolver.cache().len(),
        bytes = result.serialized.len(),
        "Transform complete"
    );
    Ok(())
}
