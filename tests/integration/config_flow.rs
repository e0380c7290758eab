//! Configuration loading feeding the publisher

use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use outbox::config::load_config;
use outbox::orchestrator::PublisherConfig;

#[test]
#[serial]
fn test_config_file_drives_publisher_settings() {
    std::env::remove_var("OUTBOX_DEFAULT_LABEL");
    std::env::remove_var("DEFAULT_FLAIR_TEXT");

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("outbox.toml");
    fs::write(
        &path,
        r#"
[retry]
max_retries = 5
initial_delay_secs = 2.0

[labels]
default_text = "Project"

[paths]
outbox_dir = "/tmp/outbox-test"
"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    let publisher_config = PublisherConfig::from_config(&config);

    assert_eq!(publisher_config.retry.max_retries, 5);
    assert_eq!(publisher_config.retry.delay_after(2), Duration::from_secs(4));
    assert_eq!(publisher_config.default_label_text.as_deref(), Some("Project"));
    assert_eq!(
        publisher_config.outbox_dir,
        std::path::PathBuf::from("/tmp/outbox-test")
    );
    assert!(publisher_config.render_dir.is_none());
}

#[test]
#[serial]
fn test_env_overrides_default_label() {
    std::env::remove_var("DEFAULT_FLAIR_TEXT");
    std::env::set_var("OUTBOX_DEFAULT_LABEL", "Research");

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("outbox.toml");
    fs::write(&path, "[labels]\ndefault_text = \"Project\"\n").unwrap();

    let config = load_config(Some(&path));
    std::env::remove_var("OUTBOX_DEFAULT_LABEL");

    assert_eq!(
        config.unwrap().labels.default_text.as_deref(),
        Some("Research")
    );
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(load_config(Some(&temp.path().join("absent.toml"))).is_err());
}

#[test]
fn test_zero_retries_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("outbox.toml");
    fs::write(&path, "[retry]\nmax_retries = 0\n").unwrap();
    assert!(load_config(Some(&path)).is_err());
}
