//! The directory poll loop, one pass at a time

use std::collections::HashSet;
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use outbox::commands::watch::{list_post_files, poll_once, PollSummary};

use super::helpers::*;

#[test]
fn test_files_processed_in_name_order() {
    let outbox = TempDir::new().unwrap();
    let posts = TempDir::new().unwrap();
    write_post(posts.path(), "b.yaml", "subreddit: rust\ntitle: Second\nbody: b\npublish: true\n");
    write_post(posts.path(), "a.json", r#"{"subreddit": "rust", "title": "First", "body": "a", "publish": true}"#);
    write_post(posts.path(), "notes.txt", "not a post");

    let names: Vec<String> = list_post_files(posts.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.json", "b.yaml"]);

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, outbox.path());
    let mut done = HashSet::new();

    poll_once(&publisher, posts.path(), false, &mut done).unwrap();
    assert_eq!(client.titles(), vec!["First".to_string(), "Second".to_string()]);
}

#[test]
fn test_published_files_are_not_reposted() {
    let outbox = TempDir::new().unwrap();
    let posts = TempDir::new().unwrap();
    write_post(posts.path(), "now.yaml", "subreddit: rust\ntitle: Now\nbody: b\npublish: true\n");
    write_post(
        posts.path(),
        "later.yaml",
        "subreddit: rust\ntitle: Later\nbody: b\npublish: true\nscheduled_at: \"2999-01-01T00:00:00Z\"\n",
    );
    write_post(posts.path(), "broken.yaml", "title: No destination\nbody: b\n");

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, outbox.path());
    let mut done = HashSet::new();

    let first = poll_once(&publisher, posts.path(), false, &mut done).unwrap();
    assert_eq!(
        first,
        PollSummary {
            processed: 2,
            invalid: 1,
            already_done: 0
        }
    );

    // Scheduled post is still waiting, published one is remembered
    let second = poll_once(&publisher, posts.path(), false, &mut done).unwrap();
    assert_eq!(
        second,
        PollSummary {
            processed: 1,
            invalid: 1,
            already_done: 1
        }
    );
    assert_eq!(client.titles(), vec!["Now".to_string()]);
}

#[test]
fn test_edited_and_removed_files_are_forgotten() {
    let outbox = TempDir::new().unwrap();
    let posts = TempDir::new().unwrap();
    let path = write_post(posts.path(), "draft.yaml", "subreddit: rust\ntitle: Draft\nbody: b\n");

    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, outbox.path());
    let mut done = HashSet::new();

    poll_once(&publisher, posts.path(), false, &mut done).unwrap();
    assert_eq!(done.len(), 1);

    fs::write(&path, "subreddit: rust\ntitle: Draft\nbody: edited\n").unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let summary = poll_once(&publisher, posts.path(), false, &mut done).unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(done.len(), 1);

    fs::remove_file(&path).unwrap();
    let summary = poll_once(&publisher, posts.path(), false, &mut done).unwrap();
    assert_eq!(summary, PollSummary::default());
    assert!(done.is_empty());
}

#[test]
fn test_missing_directory_is_an_error() {
    let outbox = TempDir::new().unwrap();
    let client = MockClient::default();
    let sleeper = InstantSleeper::default();
    let publisher = publisher(&client, &sleeper, outbox.path());
    let mut done = HashSet::new();

    assert!(poll_once(&publisher, &outbox.path().join("nope"), false, &mut done).is_err());
}
