use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use super::outcome::{PublishStatus, SubmissionResult};

/// One line of the append-only audit log.
///
/// Line format: `<ISO-8601 timestamp>\t<status>\t<remote-id-or-empty>\t<title>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub status: PublishStatus,
    pub remote_id: Option<String>,
    pub title: String,
}

impl AuditRecord {
    pub fn from_result(result: &SubmissionResult) -> Self {
        Self {
            timestamp: result.finished_at,
            status: result.status(),
            remote_id: result.outcome.remote_id().map(String::from),
            title: result.title.clone(),
        }
    }

    /// Render as a single log line (no trailing newline).
    ///
    /// Tabs and line breaks inside fields are flattened to spaces so one
    /// record always occupies exactly one line with four columns.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.status,
            flatten(self.remote_id.as_deref().unwrap_or("")),
            flatten(&self.title)
        )
    }

    pub fn parse_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.splitn(4, '\t').collect();
        if parts.len() != 4 {
            bail!("Malformed audit line (expected 4 tab-separated fields): {line}");
        }

        let timestamp = DateTime::parse_from_rfc3339(parts[0])
            .with_context(|| format!("Invalid audit timestamp: {}", parts[0]))?
            .with_timezone(&Utc);
        let status = parts[1]
            .parse::<PublishStatus>()
            .map_err(anyhow::Error::msg)?;
        let remote_id = if parts[2].is_empty() {
            None
        } else {
            Some(parts[2].to_string())
        };

        Ok(Self {
            timestamp,
            status,
            remote_id,
            title: parts[3].to_string(),
        })
    }
}

fn flatten(field: &str) -> String {
    field
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_line_layout() {
        let record = AuditRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap(),
            status: PublishStatus::Published,
            remote_id: Some("t3_abc".to_string()),
            title: "Hello world".to_string(),
        };
        assert_eq!(
            record.to_line(),
            "2025-03-01T12:30:00Z\tpublished\tt3_abc\tHello world"
        );
    }

    #[test]
    fn test_empty_remote_id_column() {
        let record = AuditRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap(),
            status: PublishStatus::Drafted,
            remote_id: None,
            title: "Draft".to_string(),
        };
        assert_eq!(record.to_line(), "2025-03-01T12:30:00Z\tdrafted\t\tDraft");

        let parsed = AuditRecord::parse_line(&record.to_line()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_title_with_tabs_and_newlines_stays_on_one_line() {
        let record = AuditRecord {
            timestamp: Utc::now(),
            status: PublishStatus::Failed,
            remote_id: None,
            title: "multi\nline\ttitle".to_string(),
        };
        let line = record.to_line();
        assert!(!line.contains('\n'));
        assert_eq!(line.matches('\t').count(), 3);
        assert!(line.ends_with("multi line title"));
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        assert!(AuditRecord::parse_line("not an audit line").is_err());
        assert!(AuditRecord::parse_line("yesterday\tpublished\t\tTitle").is_err());
        assert!(AuditRecord::parse_line("2025-03-01T12:30:00Z\tposted\t\tTitle").is_err());
    }
}
