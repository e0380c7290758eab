use std::time::Duration;

use crate::config::{secs_to_duration, RetryConfig};
use crate::models::SubmissionErrorKind;

/// Bounded exponential backoff around a whole submission attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(300),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            initial_delay: secs_to_duration(config.initial_delay_secs),
            max_delay: secs_to_duration(config.max_delay_secs),
        }
    }
}

impl RetryPolicy {
    /// Decides whether a failed attempt should be followed by another one.
    ///
    /// Every error kind is retried alike; `LabelRequired` only reaches here
    /// after its one-shot recovery already failed. Attempts are counted from 1.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Delay to wait after failed attempt number `attempt` (counted from 1).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.initial_delay, self.max_delay)
    }
}

/// Calculates exponential backoff duration for retry attempts.
///
/// Formula: initial * 2^(attempt-1), capped at max
///
/// # Examples
///
/// With initial=5s, max=300s:
/// - After attempt 1: 5s
/// - After attempt 2: 10s
/// - After attempt 3: 20s
/// - After attempt 7+: 300s (capped)
pub fn calculate_backoff(attempt: u32, initial: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let multiplier = 2u32.saturating_pow(attempt - 1);
    initial.saturating_mul(multiplier).min(max)
}

/// Whether an error kind is expected to clear up on its own.
pub fn is_transient(kind: SubmissionErrorKind) -> bool {
    matches!(kind, SubmissionErrorKind::TransientNetwork)
}
