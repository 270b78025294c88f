use super::{SourceError, SourceOptions};
use crate::extract::{parse_events, records_from_events};
use crate::fetch::{FetchRequest, Fetcher};
use crate::model::{Metric, RepositoryRecord};
use chrono::{Months, NaiveDate, NaiveTime};

pub const EVENTS_ACCEPT: &str = "application/vnd.github.v3+json";

pub fn events_url(api_url: &str, username: &str) -> String {
    format!("{}/users/{}/events?per_page=100", api_url, username)
}

/// Start of the one-month window ending on `today`.
pub fn cutoff(today: NaiveDate) -> NaiveDate {
    today.checked_sub_months(Months::new(1)).unwrap_or(today)
}

/// Fetch the latest 100 public events. The endpoint has no date filter,
/// so results are "roughly the last month" unless the cutoff is applied
/// locally.
pub async fn load<F: Fetcher>(
    fetcher: &F,
    username: &str,
    options: &SourceOptions,
) -> Result<Vec<RepositoryRecord>, SourceError> {
    let since = cutoff(options.today);
    tracing::debug!(%since, applied = options.apply_event_cutoff, "event cutoff");

    let request =
        FetchRequest::new(events_url(&options.api_url, username), "events").accept(EVENTS_ACCEPT);
    let body = fetcher.get(&request).await?;
    let events = parse_events(&body)?;
    let mut records = records_from_events(&events, username);

    if options.apply_event_cutoff {
        let since = since.and_time(NaiveTime::MIN).and_utc();
        records.retain(|r| match r.metric {
            Metric::LastActivity(at) => at >= since,
            _ => true,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::source::testing::options;

    const BODY: &str = r#"[
        {"repo": {"name": "alice/new"}, "created_at": "2024-05-10T00:00:00Z"},
        {"repo": {"name": "org1/old"}, "created_at": "2024-01-01T00:00:00Z"}
    ]"#;

    #[tokio::test]
    async fn test_requests_versioned_api() {
        let fetcher =
            MockFetcher::new().with_body(events_url("https://api.github.com", "alice"), BODY);

        let records = load(&fetcher, "alice", &options()).await.unwrap();

        assert_eq!(records.len(), 2);
        let requests = fetcher.requests();
        assert_eq!(
            requests[0].url,
            "https://api.github.com/users/alice/events?per_page=100"
        );
        assert_eq!(requests[0].accept, Some(EVENTS_ACCEPT));
    }

    #[tokio::test]
    async fn test_cutoff_only_when_enabled() {
        let fetcher =
            MockFetcher::new().with_body(events_url("https://api.github.com", "alice"), BODY);
        let opts = SourceOptions {
            apply_event_cutoff: true,
            ..options()
        };

        let records = load(&fetcher, "alice", &opts).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name(), "alice/new");
    }

    #[tokio::test]
    async fn test_status_error_names_events() {
        let fetcher = MockFetcher::new();
        let err = load(&fetcher, "alice", &options()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load events: 404");
    }

    #[test]
    fn test_cutoff_clamps_month_end() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(cutoff(today), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
