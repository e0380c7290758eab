//! Shared plumbing for command implementations.
//!
//! - Loading configuration and post files
//! - Building the publisher around the Reddit client
//! - Ctrl-C handling
//! - Printing one-line results

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::RedditClient;
use crate::config::{load_config, OutboxConfig};
use crate::models::{PostSpecification, PublishStatus, SubmissionResult};
use crate::orchestrator::{InterruptibleSleeper, Publisher, PublisherConfig};
use crate::schema::{load_post_file, validate};

pub type CliPublisher = Publisher<RedditClient, InterruptibleSleeper>;

pub fn load(config_path: Option<&Path>) -> Result<OutboxConfig> {
    load_config(config_path)
}

/// Load and validate one post file. `force_publish` overrides the file's
/// draft/publish switches.
pub fn load_spec(path: &Path, force_publish: bool) -> Result<PostSpecification> {
    let mut raw = load_post_file(path)?;
    if force_publish {
        raw.publish = Some(true);
    }
    validate(&raw).with_context(|| format!("Invalid post file: {}", path.display()))
}

/// Raise a shared flag on Ctrl-C instead of killing the process mid-write.
pub fn install_shutdown_handler() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;
    Ok(shutdown)
}

pub fn build_publisher(
    config: &OutboxConfig,
    render_dir: Option<PathBuf>,
    shutdown: Arc<AtomicBool>,
) -> Result<CliPublisher> {
    let client = RedditClient::from_env(&config.client)?;
    let mut publisher_config = PublisherConfig::from_config(config);
    publisher_config.render_dir = render_dir;
    Ok(Publisher::new(
        client,
        InterruptibleSleeper::new(shutdown),
        publisher_config,
    ))
}

pub fn status_marker(status: PublishStatus) -> colored::ColoredString {
    match status {
        PublishStatus::Published => "✓".green().bold(),
        PublishStatus::Drafted => "•".cyan().bold(),
        PublishStatus::Skipped => "⏸".yellow().bold(),
        PublishStatus::Failed => "✗".red().bold(),
    }
}

/// Print the one-line summary, plus one line per failed rebroadcast.
pub fn print_result(result: &SubmissionResult) {
    println!("{} {}", status_marker(result.status()), result.summary());
    for failure in result.outcome.fan_out_failures() {
        if let Err(e) = &failure.outcome {
            println!(
                "  {} rebroadcast to {}: {}",
                "✗".red(),
                failure.destination,
                e.to_string().dimmed()
            );
        }
    }
}

/// Truncate a string for display, appending "…" when shortened.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
