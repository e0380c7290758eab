//! Loading post documents from disk

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::types::RawPostSpec;

/// File extensions recognised as post documents.
pub const POST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Returns true if the path has a post document extension.
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| POST_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a post document from a `.yaml`, `.yml` or `.json` file.
pub fn load_post_file(path: &Path) -> Result<RawPostSpec> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read post file: {}", path.display()))?;

    match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&content)
            .with_context(|| format!("Failed to parse YAML post file: {}", path.display())),
        Some("json") => parse_json(&content)
            .with_context(|| format!("Failed to parse JSON post file: {}", path.display())),
        _ => bail!(
            "Unsupported post file type: {}. Use a .yaml, .yml or .json file.",
            path.display()
        ),
    }
}

pub fn parse_yaml(content: &str) -> Result<RawPostSpec> {
    serde_yaml::from_str(content).context("Invalid post YAML")
}

pub fn parse_json(content: &str) -> Result<RawPostSpec> {
    serde_json::from_str(content).context("Invalid post JSON")
}
