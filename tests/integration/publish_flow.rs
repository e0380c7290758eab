//! Post files on disk through the publisher

use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use outbox::commands::publish::publish_file;
use outbox::models::{Outcome, PublishStatus, SubmissionError, TaxonomyTemplate};

use super::helpers::*;

#[test]
fn test_yaml_draft_renders_and_never_submits() {
    let temp = TempDir::new().unwrap();
    let posts = TempDir::new().unwrap();
    let path = write_post(
        posts.path(),
        "digest.yaml",
        "subreddit: rust\ntitle: Weekly Digest\nbody: |\n  Three things happened.\nvisibility: private\n",
    );

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let result = publish_file(&publisher, &path, false).unwrap();
    assert_eq!(result.status(), PublishStatus::Drafted);
    assert!(client.titles().is_empty());

    let render = fs::read_to_string(temp.path().join("posts").join("weekly-digest.md")).unwrap();
    assert!(render.starts_with("# Weekly Digest"));
    assert!(render.contains("Three things happened."));
}

#[test]
fn test_force_publish_overrides_draft_flag() {
    let temp = TempDir::new().unwrap();
    let path = write_post(
        temp.path(),
        "post.json",
        r#"{"subreddit": "rust", "title": "Forced", "url": "https://example.com/x", "draft": true}"#,
    );

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let result = publish_file(&publisher, &path, true).unwrap();
    assert_eq!(result.status(), PublishStatus::Published);
    assert_eq!(client.titles(), vec!["Forced".to_string()]);
}

#[test]
fn test_invalid_file_is_an_error_not_a_result() {
    let temp = TempDir::new().unwrap();
    let path = write_post(
        temp.path(),
        "post.yaml",
        "subreddit: rust\ntitle: Both\nbody: text\nurl: https://example.com\npublish: true\n",
    );

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    assert!(publish_file(&publisher, &path, false).is_err());
    assert!(client.titles().is_empty());
    assert!(!temp.path().join("results.log").exists());
}

#[test]
fn test_label_recovery_end_to_end() {
    let temp = TempDir::new().unwrap();
    let path = write_post(
        temp.path(),
        "post.yaml",
        "subreddit: rust\ntitle: Needs flair\nbody: b\npublish: true\n",
    );

    let client = MockClient {
        labels: vec![
            TaxonomyTemplate::new("f-meta", "Meta"),
            TaxonomyTemplate::new("f-disc", "Discussion"),
        ],
        ..MockClient::failing_with(vec![SubmissionError::label_required(
            "SUBMIT_VALIDATION_FLAIR_REQUIRED",
        )])
    };
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let result = publish_file(&publisher, &path, false).unwrap();
    assert_eq!(result.status(), PublishStatus::Published);
    assert_eq!(*client.label_listings.lock().unwrap(), 1);
    assert_eq!(
        *client.submitted_labels.lock().unwrap(),
        vec![None, Some("f-disc".to_string())]
    );
    assert!(sleeper.requested.lock().unwrap().is_empty());
}

#[test]
fn test_transient_failures_exhaust_retries() {
    let temp = TempDir::new().unwrap();
    let path = write_post(
        temp.path(),
        "post.yaml",
        "subreddit: rust\ntitle: Flaky\nbody: b\npublish: true\n",
    );

    let client = MockClient::failing_with(vec![
        SubmissionError::transient("HTTP 503"),
        SubmissionError::transient("HTTP 503"),
        SubmissionError::transient("HTTP 503"),
    ]);
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let result = publish_file(&publisher, &path, false).unwrap();
    match &result.outcome {
        Outcome::Failed { attempts_made, .. } => assert_eq!(*attempts_made, 3),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        *sleeper.requested.lock().unwrap(),
        vec![Duration::from_secs(5), Duration::from_secs(10)]
    );
    assert!(result.summary().contains("after 3 attempt(s)"));
}

#[test]
fn test_crosspost_fan_out_with_partial_failure() {
    let temp = TempDir::new().unwrap();
    let path = write_post(
        temp.path(),
        "post.yaml",
        "subreddit: rust\ntitle: Share me\nurl: https://example.com/a\npublish: true\ncrosspost_to:\n  - programming\n  - closed_sub\n",
    );

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let result = publish_file(&publisher, &path, false).unwrap();
    assert_eq!(result.status(), PublishStatus::Published);
    assert_eq!(
        *client.rebroadcast_targets.lock().unwrap(),
        vec!["programming".to_string(), "closed_sub".to_string()]
    );
    let failures = result.outcome.fan_out_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].destination, "closed_sub");
    assert!(result.summary().contains("rebroadcast 1/2 ok"));
}
