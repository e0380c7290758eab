//! `outbox.toml` configuration.
//!
//! Every section is optional; a missing file yields the defaults below.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "outbox.toml";

/// Environment variables that override `labels.default_text`, highest priority first.
pub const DEFAULT_LABEL_ENV_VARS: &[&str] = &["OUTBOX_DEFAULT_LABEL", "DEFAULT_FLAIR_TEXT"];

/// Upper bound for every delay and timeout setting, in seconds (one day).
pub const MAX_DURATION_SECS: f64 = 86_400.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutboxConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: f64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}
fn default_initial_delay_secs() -> f64 {
    5.0
}
fn default_max_delay_secs() -> f64 {
    300.0
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelsConfig {
    /// Label text tried right after the one a post asks for
    #[serde(default)]
    pub default_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: f64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: f64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_auth_base")]
    pub auth_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            submit_timeout_secs: default_submit_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            api_base: default_api_base(),
            auth_base: default_auth_base(),
        }
    }
}

fn default_submit_timeout_secs() -> f64 {
    30.0
}
fn default_connect_timeout_secs() -> f64 {
    10.0
}
fn default_user_agent() -> String {
    format!("outbox/{} (automated poster)", env!("CARGO_PKG_VERSION"))
}
fn default_api_base() -> String {
    "https://oauth.reddit.com".to_string()
}
fn default_auth_base() -> String {
    "https://www.reddit.com".to_string()
}

impl ClientConfig {
    pub fn submit_timeout(&self) -> Duration {
        secs_to_duration(self.submit_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        secs_to_duration(self.connect_timeout_secs)
    }
}

/// Convert a seconds setting, clamped to `0..=MAX_DURATION_SECS`.
///
/// Values that are not numbers map to zero.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs.clamp(0.0, MAX_DURATION_SECS)).unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding `results.log`, `errors.log` and `posts/`
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            outbox_dir: default_outbox_dir(),
        }
    }
}

fn default_outbox_dir() -> PathBuf {
    PathBuf::from("outbox")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    300
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when no
/// path is given. An explicit path must exist; the default path may be absent.
pub fn load_config(path: Option<&Path>) -> Result<OutboxConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                OutboxConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<OutboxConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<OutboxConfig> {
    toml::from_str(content).context("Invalid outbox configuration")
}

fn apply_env_overrides(config: &mut OutboxConfig) {
    for var in DEFAULT_LABEL_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                config.labels.default_text = Some(value);
                break;
            }
        }
    }
}

pub fn validate_config(config: &OutboxConfig) -> Result<()> {
    if config.retry.max_retries == 0 {
        bail!("retry.max_retries must be >= 1");
    }

    for (name, value) in [
        ("retry.initial_delay_secs", config.retry.initial_delay_secs),
        ("retry.max_delay_secs", config.retry.max_delay_secs),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{name} must be a non-negative number");
        }
        if value > MAX_DURATION_SECS {
            bail!("{name} must be at most {MAX_DURATION_SECS} seconds");
        }
    }

    for (name, value) in [
        ("client.submit_timeout_secs", config.client.submit_timeout_secs),
        ("client.connect_timeout_secs", config.client.connect_timeout_secs),
    ] {
        if !value.is_finite() || value <= 0.0 {
            bail!("{name} must be > 0");
        }
        if value > MAX_DURATION_SECS {
            bail!("{name} must be at most {MAX_DURATION_SECS} seconds");
        }
    }

    if config.watch.poll_interval_secs == 0 {
        bail!("watch.poll_interval_secs must be > 0");
    }

    Ok(())
}
