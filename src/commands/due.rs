//! `outbox due` - report whether a post would go out right now

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use super::common::load_spec;
use crate::orchestrator::{check_schedule, Readiness};

pub fn execute(path: &Path) -> Result<Readiness> {
    let spec = load_spec(path, false)?;
    let readiness = check_schedule(spec.scheduled_at(), Utc::now());

    if readiness.is_ready() {
        println!("{} {} ({readiness})", "ready".green().bold(), spec.title());
    } else {
        println!("{} {} ({readiness})", "waiting".yellow().bold(), spec.title());
    }
    Ok(readiness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_due_states() {
        let temp = TempDir::new().unwrap();

        let unscheduled = temp.path().join("a.yaml");
        fs::write(&unscheduled, "title: A\ndestination: rust\nbody: b\n").unwrap();
        assert_eq!(execute(&unscheduled).unwrap(), Readiness::Unscheduled);

        let future = temp.path().join("b.yaml");
        fs::write(
            &future,
            "title: B\ndestination: rust\nbody: b\nscheduled_at: \"2999-01-01T00:00:00Z\"\n",
        )
        .unwrap();
        assert!(!execute(&future).unwrap().is_ready());

        let past = temp.path().join("c.yaml");
        fs::write(
            &past,
            "title: C\ndestination: rust\nbody: b\nscheduled_at: \"2001-01-01T00:00:00Z\"\n",
        )
        .unwrap();
        assert!(matches!(execute(&past).unwrap(), Readiness::Due { .. }));
    }
}
