//! Submission client capability.
//!
//! The publisher only talks to the platform through [`SubmissionClient`].
//! The client owns its connection/session lifecycle and any per-call
//! timeouts; a timeout surfaces as [`SubmissionErrorKind::TransientNetwork`].
//!
//! [`SubmissionErrorKind::TransientNetwork`]: crate::models::SubmissionErrorKind::TransientNetwork

pub mod http;
pub mod reddit;

use crate::models::{RemoteItem, SubmissionError, TaxonomyTemplate};

pub use reddit::{RedditClient, RedditCredentials};

/// Payload of a new (non-rebroadcast) submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPayload {
    Body(String),
    ExternalUrl(String),
}

/// A request to create new content on a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub destination: String,
    pub title: String,
    pub payload: SubmitPayload,
    /// Taxonomy template id sent along with the submission
    pub label_id: Option<String>,
}

/// A request to republish an existing item into another destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebroadcastRequest {
    pub parent_id: String,
    pub destination: String,
    pub title: String,
    pub label_id: Option<String>,
}

/// Blocking operations the publisher needs from the platform.
///
/// Every method may block for several seconds.
pub trait SubmissionClient {
    /// Create a new item on a destination.
    fn submit(&self, request: &SubmitRequest) -> Result<RemoteItem, SubmissionError>;

    /// Attach a taxonomy label to an existing item.
    fn attach_label(&self, item: &RemoteItem, label_id: &str) -> Result<(), SubmissionError>;

    /// List the labels available on a destination through the primary accessor.
    fn list_labels(&self, destination: &str) -> Result<Vec<TaxonomyTemplate>, SubmissionError>;

    /// Secondary, lower-privilege label listing used when
    /// [`list_labels`](SubmissionClient::list_labels) fails.
    fn list_labels_raw(
        &self,
        destination: &str,
    ) -> Result<Vec<TaxonomyTemplate>, SubmissionError> {
        Err(SubmissionError::other(format!(
            "no raw label listing available for {destination}"
        )))
    }

    /// Republish an existing item into a destination.
    fn rebroadcast(&self, request: &RebroadcastRequest) -> Result<RemoteItem, SubmissionError>;
}

impl<T: SubmissionClient + ?Sized> SubmissionClient for &T {
    fn submit(&self, request: &SubmitRequest) -> Result<RemoteItem, SubmissionError> {
        (**self).submit(request)
    }

    fn attach_label(&self, item: &RemoteItem, label_id: &str) -> Result<(), SubmissionError> {
        (**self).attach_label(item, label_id)
    }

    fn list_labels(&self, destination: &str) -> Result<Vec<TaxonomyTemplate>, SubmissionError> {
        (**self).list_labels(destination)
    }

    fn list_labels_raw(
        &self,
        destination: &str,
    ) -> Result<Vec<TaxonomyTemplate>, SubmissionError> {
        (**self).list_labels_raw(destination)
    }

    fn rebroadcast(&self, request: &RebroadcastRequest) -> Result<RemoteItem, SubmissionError> {
        (**self).rebroadcast(request)
    }
}
