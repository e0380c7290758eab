//! Append-only audit logs under the outbox directory.
//!
//! Published, drafted and skipped runs go to `results.log`; failed runs go
//! to `errors.log`. Lines are never rewritten or deduplicated.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::locking::{locked_append, locked_read};
use crate::models::{AuditRecord, PublishStatus};

pub const RESULTS_LOG: &str = "results.log";
pub const ERRORS_LOG: &str = "errors.log";

#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join(RESULTS_LOG)
    }

    pub fn errors_path(&self) -> PathBuf {
        self.dir.join(ERRORS_LOG)
    }

    /// Log file a record with `status` belongs in.
    pub fn path_for(&self, status: PublishStatus) -> PathBuf {
        match status {
            PublishStatus::Failed => self.errors_path(),
            PublishStatus::Skipped | PublishStatus::Drafted | PublishStatus::Published => {
                self.results_path()
            }
        }
    }

    /// Append one record as one line, creating the directory and file as needed.
    pub fn append(&self, record: &AuditRecord) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create outbox directory: {}", self.dir.display())
            })?;
        }

        let path = self.path_for(record.status);
        locked_append(&path, &format!("{}\n", record.to_line()))?;
        debug!(path = %path.display(), status = %record.status, "appended audit record");
        Ok(path)
    }

    /// Last `limit` records of one log, oldest first. Unparseable lines are skipped.
    pub fn read_recent(&self, errors: bool, limit: Option<usize>) -> Result<Vec<AuditRecord>> {
        let path = if errors {
            self.errors_path()
        } else {
            self.results_path()
        };

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = locked_read(&path)?;
        let mut records: Vec<AuditRecord> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match AuditRecord::parse_line(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable audit line");
                    None
                }
            })
            .collect();

        if let Some(n) = limit {
            let len = records.len();
            if len > n {
                records = records.split_off(len - n);
            }
        }

        Ok(records)
    }
}
