//! Post document type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A post document as written on disk, before validation.
///
/// Every field is optional here; [`super::validate`] decides what is
/// required. Aliases accept the key names used by older post files
/// (`subreddit`, `url`, `crosspost_id`, `flair_id`, `flair_text`,
/// `crosspost_to`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPostSpec {
    #[serde(default, alias = "subreddit")]
    pub destination: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, alias = "url")]
    pub external_url: Option<String>,
    #[serde(default, alias = "crosspost_id")]
    pub rebroadcast_parent: Option<String>,
    #[serde(default, alias = "flair_id")]
    pub label_id: Option<String>,
    #[serde(default, alias = "flair_text")]
    pub label_text: Option<String>,
    #[serde(default, alias = "crosspost_to")]
    pub fan_out_destinations: Vec<String>,
    /// RFC 3339 timestamp; a naive `YYYY-MM-DDTHH:MM:SS` is read as UTC
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub publish: Option<bool>,
    #[serde(default)]
    pub draft: Option<bool>,
    /// `public` means publish; anything else is a draft
    #[serde(default)]
    pub visibility: Option<String>,
    /// Keys this version does not understand; reported as lint warnings
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl RawPostSpec {
    /// Resolve the publish/draft switches into a single flag.
    ///
    /// Precedence: `publish`, then `draft`, then `visibility`. Default is draft.
    pub fn wants_publish(&self) -> bool {
        if let Some(publish) = self.publish {
            return publish;
        }
        if let Some(draft) = self.draft {
            return !draft;
        }
        self.visibility
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("public"))
    }
}

/// Why a post document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("ambiguous content: {0}")]
    AmbiguousContent(String),

    #[error("malformed destination '{destination}': {reason}")]
    MalformedDestination { destination: String, reason: String },

    #[error("invalid scheduled_at '{value}': {reason}")]
    InvalidSchedule { value: String, reason: String },

    #[error("invalid external link '{0}'")]
    InvalidLink(String),

    #[error("invalid rebroadcast parent '{value}': {reason}")]
    InvalidParent { value: String, reason: String },
}

/// Full lint report for a post document: every error plus non-fatal warnings.
#[derive(Debug, Default)]
pub struct SchemaReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
