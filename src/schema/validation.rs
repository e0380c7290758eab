//! Post document validation

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::{Content, LabelRequest, PostSpecification};
use crate::validation::{validate_destination, validate_remote_id};

use super::types::{RawPostSpec, SchemaReport, ValidationError};

/// Titles longer than this are accepted but flagged by [`check`].
pub const TITLE_SOFT_LIMIT: usize = 300;

/// Validate a raw post document into an immutable [`PostSpecification`].
///
/// Pure: no IO, no clock. Returns the first problem found, checking required
/// fields first, then the destination, then content.
pub fn validate(raw: &RawPostSpec) -> Result<PostSpecification, ValidationError> {
    let title = required(raw.title.as_deref(), "title")?;
    let destination = required_verbatim(raw.destination.as_deref(), "destination")?;
    check_destination(destination)?;

    let content = resolve_content(raw)?;
    let fan_out = raw
        .fan_out_destinations
        .iter()
        .map(|d| check_destination(d).map(|_| d.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    let scheduled_at = parse_schedule(raw.scheduled_at.as_deref())?;

    Ok(PostSpecification::new(
        destination.to_string(),
        title.to_string(),
        content,
        label_request(raw),
        fan_out,
        scheduled_at,
        raw.wants_publish(),
    ))
}

/// Lint a raw post document: collect every error and any warnings.
///
/// `now` is only used to warn about schedules that have already passed.
pub fn check(raw: &RawPostSpec, now: DateTime<Utc>) -> SchemaReport {
    let mut report = SchemaReport::default();

    let title = match required(raw.title.as_deref(), "title") {
        Ok(title) => Some(title),
        Err(e) => {
            report.errors.push(e);
            None
        }
    };
    match required_verbatim(raw.destination.as_deref(), "destination") {
        Ok(destination) => {
            if let Err(e) = check_destination(destination) {
                report.errors.push(e);
            }
            if raw.fan_out_destinations.iter().any(|d| d == destination) {
                report.warnings.push(format!(
                    "fan-out list repeats the primary destination '{destination}'"
                ));
            }
        }
        Err(e) => report.errors.push(e),
    }

    if let Err(e) = resolve_content(raw) {
        report.errors.push(e);
    }

    for dest in &raw.fan_out_destinations {
        if let Err(e) = check_destination(dest) {
            report.errors.push(e);
        }
    }

    match parse_schedule(raw.scheduled_at.as_deref()) {
        Ok(Some(at)) if at <= now => report
            .warnings
            .push(format!("scheduled_at {at} is already in the past; the post is due now")),
        Ok(_) => {}
        Err(e) => report.errors.push(e),
    }

    if let Some(title) = title {
        let len = title.chars().count();
        if len > TITLE_SOFT_LIMIT {
            report.warnings.push(format!(
                "title is {len} characters; most destinations reject titles over {TITLE_SOFT_LIMIT}"
            ));
        }
    }

    if let Some(url) = present(raw.external_url.as_deref()) {
        let lower = url.to_lowercase();
        if !lower.starts_with("http://") && !lower.starts_with("https://") {
            report
                .warnings
                .push(format!("external link '{url}' is not an http(s) URL"));
        }
    }

    if present(raw.label_id.as_deref()).is_some() && present(raw.label_text.as_deref()).is_some() {
        report
            .warnings
            .push("both label id and label text are set; the id is used".to_string());
    }

    for key in raw.extra.keys() {
        report.warnings.push(format!("unknown field '{key}' is ignored"));
    }

    report
}

/// Treat missing, empty and whitespace-only values the same way.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    present(value).ok_or(ValidationError::MissingField(field))
}

/// Like [`required`], but hands back the value untrimmed so surrounding
/// whitespace is still seen by later checks.
fn required_verbatim<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    required(value, field)?;
    value.ok_or(ValidationError::MissingField(field))
}

fn check_destination(destination: &str) -> Result<(), ValidationError> {
    validate_destination(destination).map_err(|e| ValidationError::MalformedDestination {
        destination: destination.to_string(),
        reason: e.to_string(),
    })
}

/// Exactly one of rebroadcast parent, external link and body must be set.
fn resolve_content(raw: &RawPostSpec) -> Result<Content, ValidationError> {
    let parent = present(raw.rebroadcast_parent.as_deref());
    let link = present(raw.external_url.as_deref());
    let body = present(raw.body.as_deref());

    let set: Vec<&str> = [
        parent.map(|_| "rebroadcast_parent"),
        link.map(|_| "external_url"),
        body.map(|_| "body"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if set.len() > 1 {
        return Err(ValidationError::AmbiguousContent(format!(
            "only one of body, external_url, rebroadcast_parent may be set (found {})",
            set.join(", ")
        )));
    }

    if let Some(parent) = parent {
        validate_remote_id(parent).map_err(|e| ValidationError::InvalidParent {
            value: parent.to_string(),
            reason: e.to_string(),
        })?;
        return Ok(Content::Rebroadcast(parent.to_string()));
    }

    if let Some(link) = link {
        if link.chars().any(char::is_whitespace) || !link.contains("://") {
            return Err(ValidationError::InvalidLink(link.to_string()));
        }
        return Ok(Content::ExternalLink(link.to_string()));
    }

    // Body keeps its original whitespace; only presence is judged on the trimmed text.
    match (body, raw.body.as_deref()) {
        (Some(_), Some(original)) => Ok(Content::Body(original.to_string())),
        _ => Err(ValidationError::AmbiguousContent(
            "one of body, external_url, rebroadcast_parent is required".to_string(),
        )),
    }
}

fn label_request(raw: &RawPostSpec) -> Option<LabelRequest> {
    if let Some(id) = present(raw.label_id.as_deref()) {
        return Some(LabelRequest::Id(id.to_string()));
    }
    present(raw.label_text.as_deref()).map(|text| LabelRequest::Text(text.to_string()))
}

fn parse_schedule(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(value) = present(value) else {
        return Ok(None);
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(at.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(naive.and_utc()));
        }
    }

    Err(ValidationError::InvalidSchedule {
        value: value.to_string(),
        reason: "expected an RFC 3339 timestamp such as 2025-01-31T09:00:00Z".to_string(),
    })
}
