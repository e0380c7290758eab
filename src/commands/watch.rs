//! `outbox watch` - poll a directory of post files on an interval
//!
//! Files are processed one at a time, in file-name order, each to completion
//! (retries and rebroadcasts included) before the next. A file that was
//! published or drafted is not processed again until it changes.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

use super::common::{build_publisher, install_shutdown_handler, load, load_spec, print_result};
use crate::client::SubmissionClient;
use crate::models::PublishStatus;
use crate::orchestrator::{InterruptibleSleeper, Publisher, Sleeper};
use crate::schema::is_post_file;

/// A post file as of a particular modification time.
type FileVersion = (PathBuf, Option<SystemTime>);

/// Counts for one pass over the directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollSummary {
    pub processed: usize,
    pub invalid: usize,
    pub already_done: usize,
}

pub fn execute(dir: &Path, config_path: Option<&Path>, force_publish: bool) -> Result<()> {
    let config = load(config_path)?;
    let shutdown = install_shutdown_handler()?;
    let publisher = build_publisher(&config, None, shutdown.clone())?;
    let waiter = InterruptibleSleeper::new(shutdown);
    let interval = config.watch.poll_interval();

    println!(
        "{} Watching {} every {}s (Ctrl-C to stop)",
        "→".cyan().bold(),
        dir.display(),
        interval.as_secs()
    );

    let mut done = HashSet::new();
    loop {
        let summary = poll_once(&publisher, dir, force_publish, &mut done)?;
        info!(
            processed = summary.processed,
            invalid = summary.invalid,
            already_done = summary.already_done,
            "poll finished"
        );

        if waiter.is_shutdown() || !waiter.sleep(interval) {
            break;
        }
    }

    println!("{} Stopped watching", "✓".green().bold());
    Ok(())
}

/// Post files in `dir`, sorted by file name.
pub fn list_post_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?
            .path();
        if path.is_file() && is_post_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// One pass over `dir`. `done` remembers file versions that reached a
/// settled state (published or drafted) across passes; versions whose file
/// was removed or has since changed are forgotten.
pub fn poll_once<C: SubmissionClient, S: Sleeper>(
    publisher: &Publisher<C, S>,
    dir: &Path,
    force_publish: bool,
    done: &mut HashSet<FileVersion>,
) -> Result<PollSummary> {
    let mut summary = PollSummary::default();
    done.retain(|(path, modified)| path.is_file() && modified_time(path) == *modified);

    for path in list_post_files(dir)? {
        let modified = modified_time(&path);
        let version = (path.clone(), modified);
        if done.contains(&version) {
            summary.already_done += 1;
            continue;
        }

        let spec = match load_spec(&path, force_publish) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{e:#}"), "skipping invalid post file");
                summary.invalid += 1;
                continue;
            }
        };

        let result = publisher.publish(&spec);
        print_result(&result);
        summary.processed += 1;

        if matches!(
            result.status(),
            PublishStatus::Published | PublishStatus::Drafted
        ) {
            done.insert(version);
        }
    }

    Ok(summary)
}
