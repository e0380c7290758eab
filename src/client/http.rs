//! Shared HTTP plumbing for platform clients.
//!
//! Provides client creation with bounded timeouts, size-limited response reads,
//! and mapping of transport failures onto [`SubmissionErrorKind`].

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::io::Read;

use crate::config::ClientConfig;
use crate::models::{SubmissionError, SubmissionErrorKind};

/// Upper bound on any response body we are willing to buffer.
pub(crate) const MAX_RESPONSE_BYTES: u64 = 2 * 1024 * 1024;

/// Create an HTTP client whose every request is bounded by the configured
/// per-call timeout.
/// - connect_timeout: Maximum time to establish a TCP connection
/// - timeout: Maximum time for the entire request (connection + data transfer)
pub fn create_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.submit_timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .context("Failed to create HTTP client")
}

/// Map an HTTP status onto an error kind.
///
/// 403/404 mean the destination is gone or off limits; 408, 429 and 5xx are
/// worth trying again later.
pub fn classify_status(status: StatusCode) -> SubmissionErrorKind {
    match status.as_u16() {
        403 | 404 => SubmissionErrorKind::NotFoundOrForbidden,
        408 | 429 => SubmissionErrorKind::TransientNetwork,
        s if (500..600).contains(&s) => SubmissionErrorKind::TransientNetwork,
        _ => SubmissionErrorKind::Other,
    }
}

/// Map a transport-level reqwest error. Timeouts and connection failures are transient.
pub fn classify_transport(err: &reqwest::Error, context: &str) -> SubmissionError {
    let kind = if err.is_timeout() || err.is_connect() {
        SubmissionErrorKind::TransientNetwork
    } else if let Some(status) = err.status() {
        classify_status(status)
    } else {
        SubmissionErrorKind::Other
    };
    SubmissionError::new(kind, format!("{context}: {err}"))
}

/// Fail with a classified error unless the response status is a success.
pub fn check_status(response: Response, context: &str) -> Result<Response, SubmissionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = read_body_limited(response, context).unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();
    Err(SubmissionError::new(
        classify_status(status),
        format!(
            "{}: HTTP {} - {}{}",
            context,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error"),
            if snippet.is_empty() {
                String::new()
            } else {
                format!(" ({snippet})")
            }
        ),
    ))
}

/// Read a response body as text, refusing bodies over [`MAX_RESPONSE_BYTES`].
/// Checks Content-Length first, then enforces the limit while streaming.
pub fn read_body_limited(response: Response, context: &str) -> Result<String, SubmissionError> {
    if let Some(content_length) = response.content_length() {
        if content_length > MAX_RESPONSE_BYTES {
            return Err(SubmissionError::other(format!(
                "{context}: Content-Length {content_length} bytes exceeds maximum of {MAX_RESPONSE_BYTES} bytes"
            )));
        }
    }

    let mut bytes = Vec::new();
    let mut reader = response.take(MAX_RESPONSE_BYTES + 1);
    reader.read_to_end(&mut bytes).map_err(|e| {
        SubmissionError::transient(format!("{context}: failed to read response body: {e}"))
    })?;

    if bytes.len() as u64 > MAX_RESPONSE_BYTES {
        return Err(SubmissionError::other(format!(
            "{context}: response exceeds maximum of {MAX_RESPONSE_BYTES} bytes"
        )));
    }

    String::from_utf8(bytes)
        .map_err(|_| SubmissionError::other(format!("{context}: response is not valid UTF-8")))
}

/// Read and decode a JSON response body.
pub fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, SubmissionError> {
    let body = read_body_limited(response, context)?;
    serde_json::from_str(&body)
        .map_err(|e| SubmissionError::other(format!("{context}: unexpected response: {e}")))
}
