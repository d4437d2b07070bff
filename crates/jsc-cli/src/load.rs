//! # Schema Loading
//!
//! Reads schema documents from disk. `.yaml` and `.yml` files are
//! deserialized by `serde_yaml` straight into `serde_json::Value`;
//! everything else is parsed as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn parse(self, content: &str) -> Result<Value> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

/// Load one schema document.
///
/// # Errors
///
/// Fails when the file cannot be read or does not parse. YAML mappings
/// with non-string keys are rejected since they have no JSON form.
pub fn load_schema(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let format = Format::of(path);
    format
        .parse(&content)
        .with_context(|| format!("failed to parse {format:?} in {}", path.display()))
}
