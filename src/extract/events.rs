use super::ExtractError;
use crate::model::{Metric, RepositoryRecord};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;

/// The subset of a GitHub API event this tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub repo: Option<EventRepo>,
    /// Kept as text so one bad timestamp only costs that event its date.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Event {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(%raw, error = %e, "unreadable event timestamp");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepo {
    /// `owner/name`
    pub name: String,
}

pub fn parse_events(json: &str) -> Result<Vec<Event>, ExtractError> {
    Ok(serde_json::from_str(json)?)
}

/// Collapse events into one record per repository, keeping the first
/// event seen (the API lists newest first).
///
/// Fork status can't be read from events, so it is always false.
pub fn records_from_events(events: &[Event], username: &str) -> Vec<RepositoryRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for event in events {
        let Some(repo) = &event.repo else {
            continue;
        };
        let Some((owner, name)) = repo.name.split_once('/') else {
            tracing::debug!(repo = %repo.name, "skipping event with malformed repo name");
            continue;
        };
        if !seen.insert(repo.name.as_str()) {
            continue;
        }

        let metric = event
            .created_at()
            .map(Metric::LastActivity)
            .unwrap_or_default();
        records.push(RepositoryRecord::new(owner, name, username).with_metric(metric));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EVENTS: &str = r#"[
        {"type": "PushEvent", "repo": {"name": "alice/r1"}, "created_at": "2024-05-02T10:00:00Z"},
        {"type": "PushEvent", "repo": {"name": "org1/r2"}, "created_at": "2024-05-01T09:00:00Z"},
        {"type": "IssuesEvent", "repo": {"name": "alice/r1"}, "created_at": "2024-04-20T08:00:00Z"},
        {"type": "WatchEvent", "created_at": "2024-04-19T08:00:00Z"}
    ]"#;

    #[test]
    fn test_duplicate_events_collapse_first_seen_wins() {
        let events = parse_events(EVENTS).unwrap();
        let records = records_from_events(&events, "alice");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name(), "alice/r1");
        assert!(records[0].is_personal);
        assert_eq!(
            records[0].metric,
            Metric::LastActivity(Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap())
        );

        assert_eq!(records[1].owner, "org1");
        assert!(!records[1].is_personal);
        assert!(records.iter().all(|r| !r.is_fork));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            parse_events("{not json"),
            Err(ExtractError::Json(_))
        ));
    }

    #[test]
    fn test_bad_timestamp_only_drops_that_date() {
        let json = r#"[
            {"repo": {"name": "alice/r1"}, "created_at": "yesterday-ish"},
            {"repo": {"name": "org1/r2"}, "created_at": "2024-05-01T09:00:00Z"}
        ]"#;
        let events = parse_events(json).unwrap();
        let records = records_from_events(&events, "alice");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metric, Metric::None);
        assert_eq!(
            records[1].metric,
            Metric::LastActivity(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_event_list() {
        let events = parse_events("[]").unwrap();
        assert!(records_from_events(&events, "alice").is_empty());
    }
}
