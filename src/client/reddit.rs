//! Reddit implementation of [`SubmissionClient`].
//!
//! Uses the OAuth password grant (script apps). The access token is fetched
//! lazily on the first call and dropped on HTTP 401 so the next attempt
//! re-authenticates.

use anyhow::Result;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Mutex;
use tracing::debug;

use super::http::{check_status, classify_transport, create_http_client, read_json};
use super::{RebroadcastRequest, SubmissionClient, SubmitPayload, SubmitRequest};
use crate::config::ClientConfig;
use crate::models::{RemoteItem, SubmissionError, TaxonomyTemplate};

/// Error code Reddit returns when a subreddit requires post flair.
pub const FLAIR_REQUIRED_CODE: &str = "SUBMIT_VALIDATION_FLAIR_REQUIRED";

const NOT_FOUND_CODES: &[&str] = &[
    "SUBREDDIT_NOEXIST",
    "SUBREDDIT_NOTALLOWED",
    "SUBREDDIT_REQUIRED",
    "INVALID_CROSSPOST_THING",
    "NO_CROSSPOSTS",
];

const TRANSIENT_CODES: &[&str] = &["RATELIMIT"];

/// Script-app credentials, read from the environment.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl RedditCredentials {
    pub const ENV_VARS: [&'static str; 4] = [
        "REDDIT_CLIENT_ID",
        "REDDIT_CLIENT_SECRET",
        "REDDIT_USERNAME",
        "REDDIT_PASSWORD",
    ];

    /// Read all four credential variables; lists every missing one on failure.
    pub fn from_env() -> Result<Self, SubmissionError> {
        let values: Vec<Option<String>> = Self::ENV_VARS
            .iter()
            .map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .collect();

        let missing: Vec<&str> = Self::ENV_VARS
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SubmissionError::other(format!(
                "missing credentials: {}",
                missing.join(", ")
            )));
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            client_id: next(),
            client_secret: next(),
            username: next(),
            password: next(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    json: ApiBody,
}

#[derive(Debug, Default, Deserialize)]
struct ApiBody {
    #[serde(default)]
    errors: Vec<Vec<Value>>,
    #[serde(default)]
    data: Option<SubmitData>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlairV2 {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlairSelector {
    #[serde(default)]
    choices: Vec<FlairChoice>,
}

#[derive(Debug, Deserialize)]
struct FlairChoice {
    #[serde(default)]
    flair_template_id: Option<String>,
    #[serde(default)]
    flair_text: Option<String>,
}

pub struct RedditClient {
    http: Client,
    api_base: String,
    auth_base: String,
    credentials: Option<RedditCredentials>,
    token: Mutex<Option<String>>,
}

impl RedditClient {
    /// Build a client. Never touches the network; authentication happens on first use.
    pub fn new(config: &ClientConfig, credentials: Option<RedditCredentials>) -> Result<Self> {
        Ok(Self {
            http: create_http_client(config)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            auth_base: config.auth_base.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Build a client with credentials from the environment, if present.
    /// Missing credentials only fail once a call actually needs them.
    pub fn from_env(config: &ClientConfig) -> Result<Self> {
        Self::new(config, RedditCredentials::from_env().ok())
    }

    fn access_token(&self) -> Result<String, SubmissionError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| SubmissionError::other("token cache poisoned"))?;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }

        let credentials = match &self.credentials {
            Some(c) => c.clone(),
            None => RedditCredentials::from_env()?,
        };

        debug!(client_id = %credentials.client_id, "requesting access token");
        let url = format!("{}/api/v1/access_token", self.auth_base);
        let response = self
            .http
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .map_err(|e| classify_transport(&e, "token request"))?;
        let response = check_status(response, "token request")?;
        let token: TokenResponse = read_json(response, "token request")?;

        match token.access_token {
            Some(access) if !access.is_empty() => {
                *guard = Some(access.clone());
                Ok(access)
            }
            _ => Err(SubmissionError::other(format!(
                "token request rejected: {}",
                token.error.unwrap_or_else(|| "no access token".to_string())
            ))),
        }
    }

    fn forget_token(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }

    fn send(&self, builder: RequestBuilder, context: &str) -> Result<Response, SubmissionError> {
        let token = self.access_token()?;
        let response = builder
            .bearer_auth(token)
            .send()
            .map_err(|e| classify_transport(&e, context))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.forget_token();
            return Err(SubmissionError::transient(format!(
                "{context}: access token rejected, will re-authenticate"
            )));
        }

        check_status(response, context)
    }

    fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        context: &str,
    ) -> Result<Response, SubmissionError> {
        let url = format!("{}{}", self.api_base, path);
        debug!(%url, "POST");
        self.send(self.http.post(&url).form(form), context)
    }

    fn get(&self, path: &str, context: &str) -> Result<Response, SubmissionError> {
        let url = format!("{}{}", self.api_base, path);
        debug!(%url, "GET");
        self.send(self.http.get(&url), context)
    }
}

impl SubmissionClient for RedditClient {
    fn submit(&self, request: &SubmitRequest) -> Result<RemoteItem, SubmissionError> {
        let mut form = vec![
            ("api_type", "json"),
            ("sr", request.destination.as_str()),
            ("title", request.title.as_str()),
            ("resubmit", "true"),
        ];
        match &request.payload {
            SubmitPayload::Body(body) => {
                form.push(("kind", "self"));
                form.push(("text", body.as_str()));
            }
            SubmitPayload::ExternalUrl(url) => {
                form.push(("kind", "link"));
                form.push(("url", url.as_str()));
            }
        }
        if let Some(label_id) = &request.label_id {
            form.push(("flair_id", label_id.as_str()));
        }

        let response = self.post_form("/api/submit", &form, "submit")?;
        let envelope: ApiEnvelope = read_json(response, "submit")?;
        envelope.json.into_item(&self.api_base)
    }

    fn attach_label(&self, item: &RemoteItem, label_id: &str) -> Result<(), SubmissionError> {
        let link = fullname(&item.id);
        let form = [
            ("api_type", "json"),
            ("link", link.as_str()),
            ("flair_template_id", label_id),
        ];
        let response = self.post_form("/api/selectflair", &form, "select flair")?;
        let body: Value = read_json(response, "select flair")?;

        let errors: Vec<Vec<Value>> = body
            .pointer("/json/errors")
            .and_then(|e| serde_json::from_value(e.clone()).ok())
            .unwrap_or_default();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(classify_api_errors(&errors))
        }
    }

    fn list_labels(&self, destination: &str) -> Result<Vec<TaxonomyTemplate>, SubmissionError> {
        let path = format!("/r/{destination}/api/link_flair_v2");
        let response = self.get(&path, "list link flair")?;
        let flairs: Vec<FlairV2> = read_json(response, "list link flair")?;
        Ok(flairs
            .into_iter()
            .filter_map(|f| template(f.id, f.text))
            .collect())
    }

    fn list_labels_raw(
        &self,
        destination: &str,
    ) -> Result<Vec<TaxonomyTemplate>, SubmissionError> {
        let path = format!("/r/{destination}/api/flairselector");
        let form = [("is_newlink", "true")];
        let response = self.post_form(&path, &form, "flair selector")?;
        let selector: FlairSelector = read_json(response, "flair selector")?;
        Ok(selector
            .choices
            .into_iter()
            .filter_map(|c| template(c.flair_template_id, c.flair_text))
            .collect())
    }

    fn rebroadcast(&self, request: &RebroadcastRequest) -> Result<RemoteItem, SubmissionError> {
        let parent = fullname(&request.parent_id);
        let mut form = vec![
            ("api_type", "json"),
            ("kind", "crosspost"),
            ("sr", request.destination.as_str()),
            ("title", request.title.as_str()),
            ("crosspost_fullname", parent.as_str()),
            ("resubmit", "true"),
        ];
        if let Some(label_id) = &request.label_id {
            form.push(("flair_id", label_id.as_str()));
        }

        let response = self.post_form("/api/submit", &form, "crosspost")?;
        let envelope: ApiEnvelope = read_json(response, "crosspost")?;
        envelope.json.into_item(&self.api_base)
    }
}

impl ApiBody {
    fn into_item(self, api_base: &str) -> Result<RemoteItem, SubmissionError> {
        if !self.errors.is_empty() {
            return Err(classify_api_errors(&self.errors));
        }

        let data = self
            .data
            .ok_or_else(|| SubmissionError::other("submit response carried no data"))?;
        let id = data
            .name
            .or_else(|| data.id.map(|id| fullname(&id)))
            .ok_or_else(|| SubmissionError::other("submit response carried no item id"))?;
        let url = data
            .url
            .unwrap_or_else(|| format!("{api_base}/comments/{}", id.trim_start_matches("t3_")));
        Ok(RemoteItem::new(id, url))
    }
}

/// Map Reddit's `[[CODE, message, field], ...]` error list onto an error kind.
pub fn classify_api_errors(errors: &[Vec<Value>]) -> SubmissionError {
    let codes: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.first().and_then(Value::as_str))
        .collect();

    let message = errors
        .iter()
        .map(|e| {
            let code = e.first().and_then(Value::as_str).unwrap_or("UNKNOWN");
            let text = e.get(1).and_then(Value::as_str).unwrap_or("");
            format!("{code}: {text}")
        })
        .collect::<Vec<_>>()
        .join("; ");

    if codes.contains(&FLAIR_REQUIRED_CODE) {
        SubmissionError::label_required(message)
    } else if codes.iter().any(|c| NOT_FOUND_CODES.contains(c)) {
        SubmissionError::not_found_or_forbidden(message)
    } else if codes.iter().any(|c| TRANSIENT_CODES.contains(c)) {
        SubmissionError::transient(message)
    } else {
        SubmissionError::other(message)
    }
}

/// Link fullname (`t3_<id>`) for a bare or already-prefixed id.
pub fn fullname(id: &str) -> String {
    if id.starts_with("t3_") {
        id.to_string()
    } else {
        format!("t3_{id}")
    }
}

fn template(id: Option<String>, text: Option<String>) -> Option<TaxonomyTemplate> {
    match (id, text) {
        (Some(id), Some(text)) if !id.is_empty() && !text.is_empty() => {
            Some(TaxonomyTemplate::new(id, text))
        }
        _ => None,
    }
}
