//! Resolve command implementation.
//!
//! Prints the resolved document to stdout as YAML or JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde_json::{Map, Number, Value};
use tracing::debug;
use yamlinc_core::Yaml;
use yamlinc_yaml::stringify;

/// Format of the printed document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Canonical YAML
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Arguments for the resolve command
#[derive(Debug)]
pub struct ResolveArgs {
    pub input: PathBuf,
    pub format: OutputFormat,
    pub max_depth: Option<usize>,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let mut resolver = super::resolver(args.max_depth)?;
    let resolved = resolver.resolve_file(&args.input)?;
    debug!(documents = resolver.cache().len(), "Resolution finished");

    let text = render(&resolved, args.format)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}

fn render(yaml: &Yaml, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(stringify(yaml)?),
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&to_json(yaml)?)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Convert a resolved document to JSON.
///
/// Scalar mapping keys become strings. Collection keys have no JSON form and
/// are rejected.
fn to_json(yaml: &Yaml) -> Result<Value> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(text) => yaml
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            // .inf and .nan have no JSON number
            .unwrap_or_else(|| Value::String(text.clone())),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Array(items) => Value::Array(items.iter().map(to_json).collect::<Result<_>>()?),
        Yaml::Hash(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(json_key(key)?, to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Alias(_) | Yaml::BadValue => bail!("Resolved document contains an invalid value"),
    })
}

fn json_key(key: &Yaml) -> Result<String> {
    Ok(match key {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        _ => bail!("Mapping key {key:?} cannot be written as JSON"),
    })
}
