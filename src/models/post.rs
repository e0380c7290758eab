use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// What a post carries. Exactly one variant per specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Content {
    /// Self/text post body
    Body(String),
    /// Link post pointing at an external URL
    ExternalLink(String),
    /// Republish an existing remote item (by id) into the destination
    Rebroadcast(String),
}

impl Content {
    /// Short name used in logs and draft previews.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Body(_) => "body",
            Content::ExternalLink(_) => "link",
            Content::Rebroadcast(_) => "rebroadcast",
        }
    }
}

/// Taxonomy label asked for by the author, either by template id or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelRequest {
    Id(String),
    Text(String),
}

impl LabelRequest {
    pub fn id(&self) -> Option<&str> {
        match self {
            LabelRequest::Id(id) => Some(id),
            LabelRequest::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            LabelRequest::Id(_) => None,
            LabelRequest::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for LabelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelRequest::Id(id) => write!(f, "id:{id}"),
            LabelRequest::Text(text) => write!(f, "{text}"),
        }
    }
}

/// A validated, immutable description of one post.
///
/// Only [`crate::schema::validate`] constructs these; fields are read through
/// accessors so nothing downstream can alter a specification after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSpecification {
    destination: String,
    title: String,
    content: Content,
    label_request: Option<LabelRequest>,
    fan_out_destinations: Vec<String>,
    scheduled_at: Option<DateTime<Utc>>,
    publish: bool,
}

impl PostSpecification {
    pub(crate) fn new(
        destination: String,
        title: String,
        content: Content,
        label_request: Option<LabelRequest>,
        fan_out_destinations: Vec<String>,
        scheduled_at: Option<DateTime<Utc>>,
        publish: bool,
    ) -> Self {
        Self {
            destination,
            title,
            content,
            label_request,
            fan_out_destinations,
            scheduled_at,
            publish,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn label_request(&self) -> Option<&LabelRequest> {
        self.label_request.as_ref()
    }

    /// Additional destinations the newly created item is rebroadcast to, in order.
    pub fn fan_out_destinations(&self) -> &[String] {
        &self.fan_out_destinations
    }

    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    /// `false` means draft mode: render and log only, never contact the platform.
    pub fn publish(&self) -> bool {
        self.publish
    }
}
