use chrono::{DateTime, Utc};
use std::fmt;

/// Whether a post may go out at a given moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// No schedule was set
    Unscheduled,
    /// Schedule reached or passed
    Due { scheduled_at: DateTime<Utc> },
    /// Schedule still in the future
    Waiting { scheduled_at: DateTime<Utc> },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Readiness::Waiting { .. })
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readiness::Unscheduled => write!(f, "no schedule set"),
            Readiness::Due { .. } => write!(f, "time met"),
            Readiness::Waiting { scheduled_at } => {
                write!(f, "too early, waits until {}", scheduled_at.to_rfc3339())
            }
        }
    }
}

/// Checks a post's schedule against `now`.
///
/// A post is due once `now >= scheduled_at`.
pub fn check_schedule(scheduled_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Readiness {
    match scheduled_at {
        None => Readiness::Unscheduled,
        Some(at) if now >= at => Readiness::Due { scheduled_at: at },
        Some(at) => Readiness::Waiting { scheduled_at: at },
    }
}
