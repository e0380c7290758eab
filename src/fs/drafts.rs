//! Draft rendering.
//!
//! A draft is never sent anywhere; it is rendered to markdown and kept as
//! `<dir>/posts/<slug>.md` for review.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::locking::locked_write;
use crate::models::{Content, PostSpecification};
use crate::validation::slugify;

pub const POSTS_DIR: &str = "posts";

/// Render a specification as markdown: the title heading, then the content.
pub fn render_markdown(spec: &PostSpecification) -> String {
    let content = match spec.content() {
        Content::Body(body) => body.clone(),
        Content::ExternalLink(url) => url.clone(),
        Content::Rebroadcast(parent) => format!("Rebroadcast of {parent}"),
    };
    format!("# {}\n\n{}\n", spec.title(), content)
}

/// Where the render of `title` lands under `base_dir`.
pub fn render_path(base_dir: &Path, title: &str) -> PathBuf {
    base_dir.join(POSTS_DIR).join(format!("{}.md", slugify(title)))
}

/// Write `rendered` for `title` under `base_dir`, replacing an earlier render.
pub fn write_render(base_dir: &Path, title: &str, rendered: &str) -> Result<PathBuf> {
    let path = render_path(base_dir, title);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create drafts directory: {}", parent.display()))?;
    }
    locked_write(&path, rendered)?;
    Ok(path)
}
