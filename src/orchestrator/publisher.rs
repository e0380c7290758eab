//! Publish state machine.
//!
//! One call to [`Publisher::publish`] walks a specification to exactly one
//! terminal state:
//! - Skipped when its schedule is still in the future
//! - Drafted when it is not marked for publishing (no network calls)
//! - Published once a submission succeeds
//! - Failed after the retry budget is spent
//!
//! Every terminal state appends one audit record.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use super::retry::{is_transient, RetryPolicy};
use super::schedule::check_schedule;
use super::sleeper::Sleeper;
use super::taxonomy::TaxonomyResolver;
use crate::client::{RebroadcastRequest, SubmissionClient, SubmitPayload, SubmitRequest};
use crate::config::OutboxConfig;
use crate::fs::{render_markdown, write_render, AuditLog};
use crate::models::{
    AuditRecord, Content, FanOutResult, LabelRequest, Outcome, PostSpecification, RemoteItem,
    SubmissionError, SubmissionResult,
};

#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub retry: RetryPolicy,
    /// Label text tried after the requested one when a destination demands a label
    pub default_label_text: Option<String>,
    /// Holds the audit logs, and draft renders unless `render_dir` is set
    pub outbox_dir: PathBuf,
    pub render_dir: Option<PathBuf>,
}

impl PublisherConfig {
    pub fn from_config(config: &OutboxConfig) -> Self {
        Self {
            retry: RetryPolicy::from(&config.retry),
            default_label_text: config.labels.default_text.clone(),
            outbox_dir: config.paths.outbox_dir.clone(),
            render_dir: None,
        }
    }
}

pub struct Publisher<C: SubmissionClient, S: Sleeper> {
    client: C,
    sleeper: S,
    config: PublisherConfig,
    audit: AuditLog,
}

impl<C: SubmissionClient, S: Sleeper> Publisher<C, S> {
    pub fn new(client: C, sleeper: S, config: PublisherConfig) -> Self {
        let audit = AuditLog::new(config.outbox_dir.clone());
        Self {
            client,
            sleeper,
            config,
            audit,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Publish `spec` as of the current time.
    pub fn publish(&self, spec: &PostSpecification) -> SubmissionResult {
        self.publish_at(spec, Utc::now())
    }

    /// Publish `spec`, evaluating its schedule against `now`.
    pub fn publish_at(&self, spec: &PostSpecification, now: DateTime<Utc>) -> SubmissionResult {
        let outcome = self.run(spec, now);
        let result = SubmissionResult {
            title: spec.title().to_string(),
            destination: spec.destination().to_string(),
            outcome,
            finished_at: Utc::now(),
        };

        info!(
            destination = %result.destination,
            status = %result.status(),
            "{}",
            result.summary()
        );

        if let Err(e) = self.audit.append(&AuditRecord::from_result(&result)) {
            error!(error = %e, "failed to append audit record");
        }

        result
    }

    fn run(&self, spec: &PostSpecification, now: DateTime<Utc>) -> Outcome {
        let readiness = check_schedule(spec.scheduled_at(), now);
        if !readiness.is_ready() {
            return Outcome::Skipped {
                reason: readiness.to_string(),
            };
        }

        if !spec.publish() {
            return self.draft(spec);
        }

        self.submit_with_retry(spec)
    }

    fn draft(&self, spec: &PostSpecification) -> Outcome {
        let rendered = render_markdown(spec);
        let dir = self
            .config
            .render_dir
            .as_deref()
            .unwrap_or(&self.config.outbox_dir);

        match write_render(dir, spec.title(), &rendered) {
            Ok(path) => debug!(path = %path.display(), "wrote draft render"),
            Err(e) => warn!(error = %e, "could not write draft render"),
        }

        Outcome::Drafted { rendered }
    }

    fn submit_with_retry(&self, spec: &PostSpecification) -> Outcome {
        // A label resolved during recovery is kept for later attempts.
        let mut label_id = spec
            .label_request()
            .and_then(LabelRequest::id)
            .map(String::from);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.with_label_recovery(
                spec.destination(),
                spec.label_request(),
                &mut label_id,
                |label| self.submit_primary(spec, label),
            ) {
                Ok(item) => {
                    info!(
                        destination = spec.destination(),
                        id = %item.id,
                        attempt,
                        "submission accepted"
                    );
                    if label_id.is_none() {
                        self.attach_requested_label(spec, &item);
                    }
                    let fan_out = self.fan_out(spec, &item);
                    return Outcome::Published {
                        remote_id: item.id,
                        url: item.url,
                        fan_out,
                    };
                }
                Err(error) => error,
            };

            if !self.config.retry.should_retry(attempt) {
                return Outcome::Failed {
                    error,
                    attempts_made: attempt,
                };
            }

            let delay = self.config.retry.delay_after(attempt);
            warn!(
                destination = spec.destination(),
                attempt,
                max_retries = self.config.retry.max_retries,
                transient = is_transient(error.kind),
                delay_secs = delay.as_secs_f64(),
                error = %error,
                "submission failed, backing off"
            );

            if !self.sleeper.sleep(delay) {
                warn!(destination = spec.destination(), "backoff cancelled, giving up");
                return Outcome::Failed {
                    error,
                    attempts_made: attempt,
                };
            }
        }
    }

    /// Run `send`, and when the destination rejects it for lack of a label
    /// that was never attached, resolve one and send again exactly once.
    fn with_label_recovery<F>(
        &self,
        destination: &str,
        request: Option<&LabelRequest>,
        label_id: &mut Option<String>,
        send: F,
    ) -> Result<RemoteItem, SubmissionError>
    where
        F: Fn(Option<&str>) -> Result<RemoteItem, SubmissionError>,
    {
        let error = match send(label_id.as_deref()) {
            Ok(item) => return Ok(item),
            Err(e) => e,
        };

        if !error.is_label_required() || label_id.is_some() {
            return Err(error);
        }

        let resolver =
            TaxonomyResolver::new(&self.client, self.config.default_label_text.as_deref());
        let Some(template) = resolver.resolve(destination, request) else {
            warn!(destination, "label required but none could be resolved");
            return Err(error);
        };

        info!(
            destination,
            label = %template.label_text,
            "label required, resubmitting with resolved label"
        );
        *label_id = Some(template.id);
        send(label_id.as_deref())
    }

    fn submit_primary(
        &self,
        spec: &PostSpecification,
        label_id: Option<&str>,
    ) -> Result<RemoteItem, SubmissionError> {
        let label_id = label_id.map(String::from);
        debug!(
            destination = spec.destination(),
            kind = spec.content().kind(),
            label = ?label_id,
            "submitting"
        );

        let payload = match spec.content() {
            Content::Body(body) => SubmitPayload::Body(body.clone()),
            Content::ExternalLink(url) => SubmitPayload::ExternalUrl(url.clone()),
            Content::Rebroadcast(parent_id) => {
                return self.client.rebroadcast(&RebroadcastRequest {
                    parent_id: parent_id.clone(),
                    destination: spec.destination().to_string(),
                    title: spec.title().to_string(),
                    label_id,
                });
            }
        };

        self.client.submit(&SubmitRequest {
            destination: spec.destination().to_string(),
            title: spec.title().to_string(),
            payload,
            label_id,
        })
    }

    /// Attach a label requested by text once the post exists.
    ///
    /// Only an actual match is attached; failures never affect the outcome.
    fn attach_requested_label(&self, spec: &PostSpecification, item: &RemoteItem) {
        let Some(text) = spec.label_request().and_then(LabelRequest::text) else {
            return;
        };

        let resolver =
            TaxonomyResolver::new(&self.client, self.config.default_label_text.as_deref());
        let Some(template) = resolver.find_requested(spec.destination(), text) else {
            warn!(
                destination = spec.destination(),
                label = text,
                "requested label not offered by destination"
            );
            return;
        };

        if let Err(e) = self.client.attach_label(item, &template.id) {
            warn!(
                destination = spec.destination(),
                label = text,
                error = %e,
                "could not attach requested label"
            );
        }
    }

    /// Rebroadcast the new item to each extra destination, in order.
    ///
    /// Each destination gets one try (plus label recovery); failures are
    /// recorded and never retried.
    fn fan_out(&self, spec: &PostSpecification, item: &RemoteItem) -> Vec<FanOutResult> {
        spec.fan_out_destinations()
            .iter()
            .map(|destination| {
                let mut label_id = None;
                let outcome = self.with_label_recovery(
                    destination,
                    spec.label_request(),
                    &mut label_id,
                    |label| {
                        self.client.rebroadcast(&RebroadcastRequest {
                            parent_id: item.id.clone(),
                            destination: destination.clone(),
                            title: spec.title().to_string(),
                            label_id: label.map(String::from),
                        })
                    },
                );

                match &outcome {
                    Ok(copy) => info!(destination = %destination, id = %copy.id, "rebroadcast"),
                    Err(e) => warn!(destination = %destination, error = %e, "rebroadcast failed"),
                }

                FanOutResult {
                    destination: destination.clone(),
                    outcome,
                }
            })
            .collect()
    }
}
