//! One run: fetch, extract, build the graph.
//!
//! Runs are strictly sequential and never retried. Whatever goes wrong ends
//! up as a single `PipelineError` whose message is shown as `Error: <msg>`.

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::graph::{BuildOptions, GraphData, check_tree};
use crate::source::{Source, SourceError, SourceOptions};
use chrono::NaiveDate;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The source answered but had nothing to draw.
    #[error("{0}")]
    Empty(&'static str),
}

impl PipelineError {
    /// Text for the loading indicator.
    pub fn display_message(&self) -> String {
        format!("Error: {}", self)
    }
}

/// The loading indicator. Updated between requests.
pub trait Progress: Send + Sync {
    fn update(&self, text: &str);
}

/// Keeps every update, for callers that want the history.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Progress for RecordingProgress {
    fn update(&self, text: &str) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    pub username: String,
    pub source: Source,
    pub options: SourceOptions,
    pub dedup_repos: bool,
}

impl Pipeline {
    pub fn new(username: impl Into<String>, source: Source, config: &Config, today: NaiveDate) -> Self {
        Self {
            username: username.into(),
            source,
            options: SourceOptions::from_config(config, today),
            dedup_repos: config.dedup_repos,
        }
    }

    pub fn title(&self) -> String {
        self.source.title(&self.username, self.options.today)
    }

    pub async fn run<F: Fetcher>(
        &self,
        fetcher: &F,
        progress: &dyn Progress,
    ) -> Result<GraphData, PipelineError> {
        let records = self
            .source
            .load(fetcher, &self.username, &self.options, progress)
            .await?;

        if records.is_empty() {
            return Err(PipelineError::Empty(self.source.empty_message()));
        }

        let options = BuildOptions {
            sizing: self.source.sizing(),
            title: self.title(),
            source: self.source.name().to_string(),
            dedup_repos: self.dedup_repos,
        };
        let graph = GraphData::build(&self.username, &records, &options);

        if let Err(e) = check_tree(&graph) {
            tracing::debug!(error = %e, "graph is not a clean tree");
        }
        tracing::info!(
            user = %self.username,
            source = %self.source,
            repos = graph.metadata.total_repos,
            orgs = graph.metadata.total_orgs,
            "graph built"
        );

        Ok(graph)
    }
}
