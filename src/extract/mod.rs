//! Turn fetched markup or JSON into `RepositoryRecord`s.
//!
//! Everything here is tied to GitHub's current, unversioned markup. Each
//! extractor only takes text in and hands records out, so a broken one can
//! be replaced without touching graph building or rendering.

mod activity;
mod events;
mod listing;

pub use activity::{COMMITS_MARKER, parse_activity_page};
pub use events::{Event, EventRepo, parse_events, records_from_events};
pub use listing::{ListingPage, parse_listing_page};

use scraper::ElementRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Activity timeline item not found")]
    TimelineNotFound,
    #[error("Repository list not found")]
    RepoListNotFound,
    #[error("Failed to parse events: {0}")]
    Json(#[from] serde_json::Error),
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
