use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::failure::SubmissionError;
use super::label::RemoteItem;

/// Terminal status of one publish invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Skipped,
    Drafted,
    Published,
    Failed,
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStatus::Skipped => "skipped",
            PublishStatus::Drafted => "drafted",
            PublishStatus::Published => "published",
            PublishStatus::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PublishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skipped" => Ok(PublishStatus::Skipped),
            "drafted" => Ok(PublishStatus::Drafted),
            "published" => Ok(PublishStatus::Published),
            "failed" => Ok(PublishStatus::Failed),
            other => Err(format!("unknown publish status: {other}")),
        }
    }
}

/// Result of rebroadcasting the new item to one extra destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOutResult {
    pub destination: String,
    pub outcome: Result<RemoteItem, SubmissionError>,
}

impl FanOutResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    Skipped {
        reason: String,
    },
    Drafted {
        rendered: String,
    },
    Published {
        remote_id: String,
        url: String,
        /// Per-destination rebroadcast results; failures here never undo the primary post
        fan_out: Vec<FanOutResult>,
    },
    Failed {
        error: SubmissionError,
        attempts_made: u32,
    },
}

impl Outcome {
    pub fn status(&self) -> PublishStatus {
        match self {
            Outcome::Skipped { .. } => PublishStatus::Skipped,
            Outcome::Drafted { .. } => PublishStatus::Drafted,
            Outcome::Published { .. } => PublishStatus::Published,
            Outcome::Failed { .. } => PublishStatus::Failed,
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        match self {
            Outcome::Published { remote_id, .. } => Some(remote_id),
            _ => None,
        }
    }

    /// Fan-out entries that failed, in the order they were attempted.
    pub fn fan_out_failures(&self) -> Vec<&FanOutResult> {
        match self {
            Outcome::Published { fan_out, .. } => fan_out.iter().filter(|r| !r.is_ok()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Everything one publish invocation produced. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub title: String,
    pub destination: String,
    pub outcome: Outcome,
    pub finished_at: DateTime<Utc>,
}

impl SubmissionResult {
    pub fn status(&self) -> PublishStatus {
        self.outcome.status()
    }

    /// One-line human-readable summary of the terminal state.
    pub fn summary(&self) -> String {
        let dest = &self.destination;
        let title = &self.title;
        match &self.outcome {
            Outcome::Skipped { reason } => format!("Skipped '{title}' for {dest}: {reason}"),
            Outcome::Drafted { .. } => format!("Drafted '{title}' for {dest} (not submitted)"),
            Outcome::Published { url, fan_out, .. } => {
                let failed = fan_out.iter().filter(|r| !r.is_ok()).count();
                if fan_out.is_empty() {
                    format!("Published '{title}' to {dest}: {url}")
                } else {
                    format!(
                        "Published '{title}' to {dest}: {url} (rebroadcast {}/{} ok)",
                        fan_out.len() - failed,
                        fan_out.len()
                    )
                }
            }
            Outcome::Failed {
                error,
                attempts_made,
            } => format!("Failed to publish '{title}' to {dest} after {attempts_made} attempt(s): {error}"),
        }
    }
}
