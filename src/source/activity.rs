use super::events::cutoff;
use super::{SourceError, SourceOptions};
use crate::extract::parse_activity_page;
use crate::fetch::{FetchRequest, Fetcher};
use crate::model::RepositoryRecord;
use chrono::NaiveDate;

/// Calendar range for the activity overview, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn last_month(today: NaiveDate) -> Self {
        Self {
            from: cutoff(today),
            to: today,
        }
    }
}

pub fn overview_url(web_url: &str, username: &str, range: DateRange) -> String {
    format!(
        "{}/{}?tab=overview&from={}&to={}",
        web_url,
        username,
        range.from.format("%Y-%m-%d"),
        range.to.format("%Y-%m-%d")
    )
}

pub async fn load<F: Fetcher>(
    fetcher: &F,
    username: &str,
    options: &SourceOptions,
) -> Result<Vec<RepositoryRecord>, SourceError> {
    let range = DateRange::last_month(options.today);
    let request = FetchRequest::new(overview_url(&options.web_url, username, range), "page");
    let html = fetcher.get(&request).await?;
    Ok(parse_activity_page(&html, username)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;
    use crate::fetch::MockFetcher;
    use crate::source::testing::options;

    #[test]
    fn test_overview_url_uses_iso_dates() {
        let range = DateRange::last_month(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(
            overview_url("https://github.com", "alice", range),
            "https://github.com/alice?tab=overview&from=2023-12-10&to=2024-01-10"
        );
    }

    #[tokio::test]
    async fn test_missing_marker_surfaces_as_error() {
        let url = overview_url(
            "https://github.com",
            "alice",
            DateRange::last_month(options().today),
        );
        let fetcher = MockFetcher::new().with_body(url, "<html><body></body></html>");

        let err = load(&fetcher, "alice", &options()).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Extract(ExtractError::TimelineNotFound)
        ));
    }
}
