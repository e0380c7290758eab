//! `outbox check` - lint post files without contacting the platform

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::schema::{check, load_post_file, SchemaReport};

/// Lint one file. Unreadable or unparseable files are errors of the command itself.
pub fn check_file(path: &Path, now: DateTime<Utc>) -> Result<SchemaReport> {
    let raw = load_post_file(path)?;
    Ok(check(&raw, now))
}

pub fn execute(paths: Vec<PathBuf>) -> Result<()> {
    let now = Utc::now();
    let mut invalid = 0;

    for path in &paths {
        let report = match check_file(path, now) {
            Ok(report) => report,
            Err(e) => {
                println!("{} {}: {e:#}", "✗".red().bold(), path.display());
                invalid += 1;
                continue;
            }
        };

        if report.is_valid() {
            println!("{} {}", "✓".green().bold(), path.display());
        } else {
            println!("{} {}", "✗".red().bold(), path.display());
            invalid += 1;
        }
        for error in &report.errors {
            println!("  {} {error}", "error:".red());
        }
        for warning in &report.warnings {
            println!("  {} {warning}", "warning:".yellow());
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} post file(s) failed validation", paths.len());
    }
    Ok(())
}
