//! Where repository records come from.
//!
//! Each source owns its URL layout, pagination, and which extractor reads
//! the response. They all end in the same `Vec<RepositoryRecord>`.

mod activity;
mod events;
mod listing;

pub use activity::DateRange;

use crate::config::Config;
use crate::extract::ExtractError;
use crate::fetch::{FetchError, Fetcher};
use crate::graph::Sizing;
use crate::model::RepositoryRecord;
use crate::pipeline::Progress;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Every repository on the profile's repositories tab
    #[default]
    #[serde(alias = "repos", alias = "repositories")]
    #[value(alias = "repos", alias = "repositories")]
    Listing,
    /// Repositories touched by the user's recent public events
    Events,
    /// Repositories from the last month's activity overview, sized by commit share
    #[serde(alias = "overview")]
    #[value(alias = "overview")]
    Activity,
}

/// Settings a source needs beyond the username.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub web_url: String,
    pub api_url: String,
    pub max_pages: u32,
    pub apply_event_cutoff: bool,
    /// "Today" for date-bounded sources.
    pub today: NaiveDate,
}

impl SourceOptions {
    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self {
            web_url: config.github.web_url.clone(),
            api_url: config.github.api_url.clone(),
            max_pages: config.max_pages,
            apply_event_cutoff: config.apply_event_cutoff,
            today,
        }
    }
}

impl Source {
    pub fn name(self) -> &'static str {
        match self {
            Source::Listing => "listing",
            Source::Events => "events",
            Source::Activity => "activity",
        }
    }

    pub fn sizing(self) -> Sizing {
        match self {
            Source::Activity => Sizing::CommitShare,
            Source::Listing | Source::Events => Sizing::Fixed,
        }
    }

    pub fn title(self, username: &str, today: NaiveDate) -> String {
        match self {
            Source::Listing => format!("Repository Link Graph: {}", username),
            Source::Events => format!("Contribution Graph: {} (last month)", username),
            Source::Activity => {
                let range = DateRange::last_month(today);
                format!("Repository Links ({} to {})", range.from, range.to)
            }
        }
    }

    /// Loading text shown before the first request goes out.
    pub fn initial_status(self) -> &'static str {
        match self {
            Source::Listing => "Preparing to load repositories...",
            Source::Events => "Fetching recent contributions...",
            Source::Activity => "Loading activity...",
        }
    }

    /// Message for a run that found nothing to draw.
    pub fn empty_message(self) -> &'static str {
        match self {
            Source::Listing => "No repositories found",
            Source::Events => "No recent contributions found",
            Source::Activity => "No repository activity found",
        }
    }

    pub async fn load<F: Fetcher>(
        self,
        fetcher: &F,
        username: &str,
        options: &SourceOptions,
        progress: &dyn Progress,
    ) -> Result<Vec<RepositoryRecord>, SourceError> {
        progress.update(self.initial_status());
        match self {
            Source::Listing => listing::load(fetcher, username, options, progress).await,
            Source::Events => events::load(fetcher, username, options).await,
            Source::Activity => activity::load(fetcher, username, options).await,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_per_source() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(
            Source::Listing.title("alice", today),
            "Repository Link Graph: alice"
        );
        assert_eq!(
            Source::Events.title("alice", today),
            "Contribution Graph: alice (last month)"
        );
        assert_eq!(
            Source::Activity.title("alice", today),
            "Repository Links (2024-04-15 to 2024-05-15)"
        );
    }

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        source: Source,
    }

    fn from_toml(name: &str) -> Result<Source, toml::de::Error> {
        toml::from_str::<Wrapper>(&format!("source = \"{}\"", name)).map(|w| w.source)
    }

    #[test]
    fn test_deserialize_names_and_aliases() {
        assert_eq!(from_toml("events").unwrap(), Source::Events);
        assert_eq!(from_toml("repos").unwrap(), Source::Listing);
        assert_eq!(from_toml("overview").unwrap(), Source::Activity);
        assert!(from_toml("stars").is_err());
    }

    #[test]
    fn test_cli_aliases() {
        use clap::ValueEnum;
        assert_eq!(Source::from_str("overview", true), Ok(Source::Activity));
        assert_eq!(Source::from_str("Repositories", true), Ok(Source::Listing));
    }
}
