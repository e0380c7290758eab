//! Audit records written by the publisher

use std::fs;
use tempfile::TempDir;

use outbox::fs::AuditLog;
use outbox::models::{AuditRecord, PublishStatus, SubmissionError};
use outbox::schema::{parse_yaml, validate};

use super::helpers::*;

#[test]
fn test_one_line_per_invocation_in_tab_format() {
    let temp = TempDir::new().unwrap();
    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let spec = validate(
        &parse_yaml("subreddit: rust\ntitle: Audited\nbody: b\npublish: true\n").unwrap(),
    )
    .unwrap();
    publisher.publish(&spec);
    publisher.publish(&spec);

    let content = fs::read_to_string(temp.path().join("results.log")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    for (line, id) in lines.iter().zip(["id1", "id2"]) {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[1], "published");
        assert_eq!(fields[2], id);
        assert_eq!(fields[3], "Audited");
        assert!(AuditRecord::parse_line(line).is_ok());
    }
}

#[test]
fn test_failures_go_to_error_log() {
    let temp = TempDir::new().unwrap();
    let client = MockClient::failing_with(vec![
        SubmissionError::other("bad request"),
        SubmissionError::other("bad request"),
        SubmissionError::other("bad request"),
    ]);
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let spec = validate(
        &parse_yaml("subreddit: rust\ntitle: Broken\nbody: b\npublish: true\n").unwrap(),
    )
    .unwrap();
    publisher.publish(&spec);

    let log = AuditLog::new(temp.path());
    assert!(log.read_recent(false, None).unwrap().is_empty());
    let errors = log.read_recent(true, None).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].status, PublishStatus::Failed);
    assert_eq!(errors[0].remote_id, None);
    assert_eq!(errors[0].title, "Broken");
}

#[test]
fn test_skipped_and_drafted_are_results() {
    let temp = TempDir::new().unwrap();
    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, temp.path());

    let later = validate(
        &parse_yaml(
            "subreddit: rust\ntitle: Later\nbody: b\npublish: true\nscheduled_at: \"2999-01-01T09:00:00\"\n",
        )
        .unwrap(),
    )
    .unwrap();
    let draft = validate(&parse_yaml("subreddit: rust\ntitle: Draft\nbody: b\n").unwrap()).unwrap();

    publisher.publish(&later);
    publisher.publish(&draft);

    let statuses: Vec<PublishStatus> = AuditLog::new(temp.path())
        .read_recent(false, None)
        .unwrap()
        .into_iter()
        .map(|r| r.status)
        .collect();
    assert_eq!(statuses, vec![PublishStatus::Skipped, PublishStatus::Drafted]);
    assert!(client.titles().is_empty());
}
