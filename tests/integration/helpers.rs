//! Shared test helpers: a scripted client, an instant sleeper and post files

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use outbox::client::{RebroadcastRequest, SubmissionClient, SubmitRequest};
use outbox::models::{RemoteItem, SubmissionError, TaxonomyTemplate};
use outbox::orchestrator::{Publisher, PublisherConfig, RetryPolicy, Sleeper};

/// Client whose submit results are queued up front. Once the queue is empty
/// every submit succeeds with a fresh id.
#[derive(Default)]
pub struct MockClient {
    pub submit_queue: Mutex<VecDeque<Result<RemoteItem, SubmissionError>>>,
    pub labels: Vec<TaxonomyTemplate>,
    pub submitted_titles: Mutex<Vec<String>>,
    pub submitted_labels: Mutex<Vec<Option<String>>>,
    pub rebroadcast_targets: Mutex<Vec<String>>,
    pub label_listings: Mutex<u32>,
}

impl MockClient {
    pub fn failing_with(errors: Vec<SubmissionError>) -> Self {
        Self {
            submit_queue: Mutex::new(errors.into_iter().map(Err).collect()),
            ..Default::default()
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.submitted_titles.lock().unwrap().clone()
    }
}

impl SubmissionClient for MockClient {
    fn submit(&self, request: &SubmitRequest) -> Result<RemoteItem, SubmissionError> {
        let mut titles = self.submitted_titles.lock().unwrap();
        titles.push(request.title.clone());
        self.submitted_labels
            .lock()
            .unwrap()
            .push(request.label_id.clone());
        let n = titles.len();
        self.submit_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(RemoteItem::new(
                    format!("id{n}"),
                    format!("https://example.com/id{n}"),
                ))
            })
    }

    fn attach_label(&self, _item: &RemoteItem, _label_id: &str) -> Result<(), SubmissionError> {
        Ok(())
    }

    fn list_labels(&self, _destination: &str) -> Result<Vec<TaxonomyTemplate>, SubmissionError> {
        *self.label_listings.lock().unwrap() += 1;
        Ok(self.labels.clone())
    }

    fn rebroadcast(&self, request: &RebroadcastRequest) -> Result<RemoteItem, SubmissionError> {
        self.rebroadcast_targets
            .lock()
            .unwrap()
            .push(request.destination.clone());
        if request.destination.starts_with("closed") {
            return Err(SubmissionError::not_found_or_forbidden(
                "crossposting disabled",
            ));
        }
        Ok(RemoteItem::new(
            format!("x{}", request.destination),
            format!("https://example.com/{}", request.destination),
        ))
    }
}

/// Sleeper that returns immediately and remembers what it was asked for.
#[derive(Default)]
pub struct InstantSleeper {
    pub requested: Mutex<Vec<Duration>>,
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, duration: Duration) -> bool {
        self.requested.lock().unwrap().push(duration);
        true
    }
}

pub fn publisher_config(outbox_dir: &Path) -> PublisherConfig {
    PublisherConfig {
        retry: RetryPolicy::default(),
        default_label_text: Some("Discussion".to_string()),
        outbox_dir: outbox_dir.to_path_buf(),
        render_dir: None,
    }
}

pub fn publisher<'a>(
    client: &'a MockClient,
    sleeper: &'a InstantSleeper,
    outbox_dir: &Path,
) -> Publisher<&'a MockClient, &'a InstantSleeper> {
    Publisher::new(client, sleeper, publisher_config(outbox_dir))
}

/// Write a post file into `dir` and return its path.
pub fn write_post(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write post file");
    path
}
