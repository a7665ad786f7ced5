//! Canonical YAML output.

use crate::{Error, Result};
use yaml_rust2::{Yaml, YamlEmitter};

/// Serialize a value to YAML text.
///
/// The output is the canonical form used between resolution passes and for
/// written files:
///
/// - lines are never wrapped, however long a scalar is
/// - repeated values are written out in full; no anchors or aliases
/// - no leading `---` document marker
/// - always ends with a newline
/// - every string that would read back as another type is double-quoted
pub fn stringify(yaml: &Yaml) -> Result<String> {
    let protected = quote_ambiguous_strings(yaml);
    let mut out = String::new();
    {
        let mut emitter = YamlEmitter::new(&mut out);
        emitter
            .dump(&protected)
            .map_err(|err| Error::Emit(err.to_string()))?;
    }

    let body = out.strip_prefix("---").unwrap_or(&out);
    let body = body
        .strip_prefix('\n')
        .or_else(|| body.strip_prefix(' '))
        .unwrap_or(body);

    let mut text = body.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Copy of `yaml` in which strings the parser would retype when written plain
/// (`0o17`, `+5`, `null`) are replaced by their double-quoted text.
///
/// The emitter only quotes the number and keyword forms it knows about. It
/// writes `Yaml::Real` text verbatim, so the quoted form rides in a `Real`.
fn quote_ambiguous_strings(yaml: &Yaml) -> Yaml {
    match yaml {
        Yaml::String(s) if reads_back_differently(s) => Yaml::Real(double_quoted(s)),
        Yaml::Array(items) => Yaml::Array(items.iter().map(quote_ambiguous_strings).collect()),
        Yaml::Hash(entries) => Yaml::Hash(
            entries
                .iter()
                .map(|(key, value)| (quote_ambiguous_strings(key), quote_ambiguous_strings(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn reads_back_differently(s: &str) -> bool {
    !matches!(Yaml::from_str(s), Yaml::String(ref plain) if plain == s)
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
