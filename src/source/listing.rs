use super::{SourceError, SourceOptions};
use crate::config::clamp_pages;
use crate::extract::parse_listing_page;
use crate::fetch::{FetchRequest, Fetcher};
use crate::model::RepositoryRecord;
use crate::pipeline::Progress;

pub fn page_url(web_url: &str, username: &str, page: u32) -> String {
    format!("{}/{}?page={}&tab=repositories", web_url, username, page)
}

/// Walk the repositories tab one page at a time until the pager runs out
/// or the page cap is hit.
pub async fn load<F: Fetcher>(
    fetcher: &F,
    username: &str,
    options: &SourceOptions,
    progress: &dyn Progress,
) -> Result<Vec<RepositoryRecord>, SourceError> {
    let max_pages = clamp_pages(options.max_pages);
    let mut repos = Vec::new();

    for page in 1..=max_pages {
        let request = FetchRequest::new(page_url(&options.web_url, username, page), "repositories");
        let html = fetcher.get(&request).await?;
        let parsed = parse_listing_page(&html, username);

        tracing::debug!(page, found = parsed.repos.len(), more = parsed.more_pages, "listing page");
        repos.extend(parsed.repos);
        progress.update(&format!("Loaded {} repositories...", repos.len()));

        if !parsed.more_pages {
            break;
        }
        if page == max_pages {
            tracing::warn!(max_pages, "stopped at page cap with more pages available");
        }
    }

    Ok(repos)
}
