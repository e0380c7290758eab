//! `outbox log` - show recent audit records

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::common::{load, status_marker, truncate};
use crate::fs::AuditLog;

pub fn execute(config_path: Option<&Path>, limit: usize, errors: bool) -> Result<()> {
    let config = load(config_path)?;
    let log = AuditLog::new(config.paths.outbox_dir);
    let records = log.read_recent(errors, Some(limit))?;

    if records.is_empty() {
        let path = if errors {
            log.errors_path()
        } else {
            log.results_path()
        };
        println!("{} No records in {}", "─".dimmed(), path.display());
        return Ok(());
    }

    for record in records {
        println!(
            "{} {} {:<9} {:<10} {}",
            status_marker(record.status),
            record
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed(),
            record.status.to_string(),
            record.remote_id.as_deref().unwrap_or("-"),
            truncate(&record.title, 72)
        );
    }
    Ok(())
}
