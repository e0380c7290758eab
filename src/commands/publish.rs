//! `outbox publish` - run one post file through the publisher

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use super::common::{build_publisher, install_shutdown_handler, load, load_spec, print_result};
use crate::client::SubmissionClient;
use crate::models::{PublishStatus, SubmissionResult};
use crate::orchestrator::{Publisher, Sleeper};

pub struct PublishOptions {
    pub config_path: Option<PathBuf>,
    /// Publish even if the file says draft
    pub force_publish: bool,
    pub render_dir: Option<PathBuf>,
    pub json: bool,
}

pub fn execute(path: &Path, options: PublishOptions) -> Result<()> {
    let config = load(options.config_path.as_deref())?;
    let shutdown = install_shutdown_handler()?;
    let publisher = build_publisher(&config, options.render_dir, shutdown)?;

    let result = publish_file(&publisher, path, options.force_publish)?;
    if options.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{json}");
    } else {
        print_result(&result);
    }

    if result.status() == PublishStatus::Failed {
        bail!("Submission of {} failed", path.display());
    }
    Ok(())
}

/// Validate `path` and publish it. Only an invalid file is an error here;
/// every terminal state comes back as a result.
pub fn publish_file<C: SubmissionClient, S: Sleeper>(
    publisher: &Publisher<C, S>,
    path: &Path,
    force_publish: bool,
) -> Result<SubmissionResult> {
    let spec = load_spec(path, force_publish)?;
    Ok(publisher.publish(&spec))
}
