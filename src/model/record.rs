use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped repository, normalized across every data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub owner: String,
    pub name: String,
    pub is_fork: bool,
    pub is_personal: bool,
    pub metric: Metric,
}

/// Per-repository value used to size nodes and weight edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Metric {
    /// Fixed weight; the source carries no per-repository measure.
    #[default]
    None,
    /// Share of the user's commits in the period, in percent.
    CommitShare(u32),
    /// Timestamp of the most recent event seen for the repository.
    LastActivity(DateTime<Utc>),
}

impl RepositoryRecord {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, username: &str) -> Self {
        let owner = owner.into();
        let is_personal = owner == username;
        Self {
            owner,
            name: name.into(),
            is_fork: false,
            is_personal,
            metric: Metric::None,
        }
    }

    pub fn with_fork(mut self, is_fork: bool) -> Self {
        self.is_fork = is_fork;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// `owner/name`, also used as the repository's node id.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl Metric {
    /// Commit percentage, or zero when the source doesn't provide one.
    pub fn commit_share(&self) -> u32 {
        match self {
            Metric::CommitShare(p) => *p,
            _ => 0,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Metric::None)
    }

    /// Hover text shown on the rendered node, if the metric has any.
    pub fn describe(&self) -> Option<String> {
        match self {
            Metric::None => None,
            Metric::CommitShare(p) => Some(format!("{}% of commits", p)),
            Metric::LastActivity(at) => Some(format!("Last activity: {}", at.format("%Y-%m-%d"))),
        }
    }
}
