use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a failed call against the submission platform.
///
/// Different kinds have different handling strategies:
/// - `LabelRequired` triggers a one-shot label recovery within the same attempt
/// - `NotFoundOrForbidden`, `TransientNetwork` and `Other` consume a retry slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionErrorKind {
    /// Destination rejected the submission because a taxonomy label is mandatory
    LabelRequired,

    /// Destination or parent item does not exist, or access is denied
    NotFoundOrForbidden,

    /// Timeout, connection failure, rate limiting or server-side error
    TransientNetwork,

    /// Anything the client could not classify
    Other,
}

impl fmt::Display for SubmissionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionErrorKind::LabelRequired => "label-required",
            SubmissionErrorKind::NotFoundOrForbidden => "not-found-or-forbidden",
            SubmissionErrorKind::TransientNetwork => "transient-network",
            SubmissionErrorKind::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// Error raised by a [`SubmissionClient`](crate::client::SubmissionClient) call.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct SubmissionError {
    pub kind: SubmissionErrorKind,
    pub message: String,
}

impl SubmissionError {
    pub fn new(kind: SubmissionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn label_required(message: impl Into<String>) -> Self {
        Self::new(SubmissionErrorKind::LabelRequired, message)
    }

    pub fn not_found_or_forbidden(message: impl Into<String>) -> Self {
        Self::new(SubmissionErrorKind::NotFoundOrForbidden, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(SubmissionErrorKind::TransientNetwork, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(SubmissionErrorKind::Other, message)
    }

    pub fn is_label_required(&self) -> bool {
        self.kind == SubmissionErrorKind::LabelRequired
    }
}
