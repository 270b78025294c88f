use crate::model::{Metric, RepositoryRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const GITHUB_URL: &str = "https://github.com";

/// Graph data in D3.js force-directed graph format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub metadata: GraphMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    /// Hover text; empty when the node has nothing to say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    User,
    Org,
    Repo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Edge weight, drawn as stroke width.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub username: String,
    pub title: String,
    pub source: String,
    pub total_repos: usize,
    pub total_orgs: usize,
}

/// How repository metrics turn into node sizes and edge weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    /// Every repository looks the same.
    #[default]
    Fixed,
    /// Repositories grow with their share of the user's commits.
    CommitShare,
}

pub const USER_SIZE: f64 = 30.0;
pub const ORG_SIZE: f64 = 25.0;
pub const REPO_SIZE: f64 = 20.0;
pub const ORG_LINK_WEIGHT: f64 = 1.0;
pub const REPO_LINK_WEIGHT: f64 = 2.0;
pub const MAX_SHARE_WEIGHT: f64 = 5.0;

impl Sizing {
    pub fn repo_size(self, metric: &Metric) -> f64 {
        match self {
            Sizing::Fixed => REPO_SIZE,
            Sizing::CommitShare => 15.0 + (f64::from(metric.commit_share()) + 1.0).ln() * 3.0,
        }
    }

    pub fn repo_weight(self, metric: &Metric) -> f64 {
        match self {
            Sizing::Fixed => REPO_LINK_WEIGHT,
            Sizing::CommitShare => (f64::from(metric.commit_share()) / 20.0).min(MAX_SHARE_WEIGHT),
        }
    }
}

/// Inputs that don't come from the scraped records themselves.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub sizing: Sizing,
    pub title: String,
    pub source: String,
    /// Drop repeated `owner/name` records instead of emitting duplicate ids.
    pub dedup_repos: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            sizing: Sizing::Fixed,
            title: String::new(),
            source: String::new(),
            dedup_repos: false,
        }
    }
}

impl GraphData {
    /// Turn a repository list into a two-level tree rooted at `username`.
    ///
    /// Organization nodes appear in first-occurrence order. Repository
    /// nodes are emitted once per record, so a repeated record yields a
    /// repeated id unless `dedup_repos` is set.
    pub fn build(username: &str, records: &[RepositoryRecord], options: &BuildOptions) -> Self {
        let mut nodes = vec![GraphNode {
            id: username.to_string(),
            name: username.to_string(),
            kind: NodeKind::User,
            size: USER_SIZE,
            url: Some(format!("{}/{}", GITHUB_URL, username)),
            fork: None,
            metric: None,
            tooltip: None,
        }];
        let mut links = Vec::new();

        let mut orgs: HashSet<&str> = HashSet::new();
        for record in records {
            if record.is_personal || !orgs.insert(record.owner.as_str()) {
                continue;
            }
            nodes.push(GraphNode {
                id: record.owner.clone(),
                name: record.owner.clone(),
                kind: NodeKind::Org,
                size: ORG_SIZE,
                url: Some(format!("{}/{}", GITHUB_URL, record.owner)),
                fork: None,
                metric: None,
                tooltip: None,
            });
            links.push(GraphLink {
                source: username.to_string(),
                target: record.owner.clone(),
                value: ORG_LINK_WEIGHT,
            });
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut total_repos = 0;
        for record in records {
            let id = record.full_name();
            if options.dedup_repos && !seen.insert(id.clone()) {
                continue;
            }

            let metric = (!record.metric.is_none()).then_some(record.metric);
            nodes.push(GraphNode {
                id: id.clone(),
                name: record.name.clone(),
                kind: NodeKind::Repo,
                size: options.sizing.repo_size(&record.metric),
                url: Some(format!("{}/{}", GITHUB_URL, id)),
                fork: Some(record.is_fork),
                metric,
                tooltip: record.metric.describe(),
            });

            let source = if record.is_personal {
                username.to_string()
            } else {
                record.owner.clone()
            };
            links.push(GraphLink {
                source,
                target: id,
                value: options.sizing.repo_weight(&record.metric),
            });
            total_repos += 1;
        }

        let metadata = GraphMetadata {
            username: username.to_string(),
            title: options.title.clone(),
            source: options.source.clone(),
            total_repos,
            total_orgs: orgs.len(),
        };

        GraphData {
            nodes,
            links,
            metadata,
        }
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Links pointing at `id`.
    pub fn inbound(&self, id: &str) -> Vec<&GraphLink> {
        self.links.iter().filter(|l| l.target == id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<RepositoryRecord> {
        vec![
            RepositoryRecord::new("alice", "r1", "alice"),
            RepositoryRecord::new("org1", "r2", "alice"),
            RepositoryRecord::new("org2", "r3", "alice").with_fork(true),
            RepositoryRecord::new("org1", "r4", "alice"),
        ]
    }

    #[test]
    fn test_builds_two_level_tree() {
        let graph = GraphData::build("alice", &sample(), &BuildOptions::default());

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["alice", "org1", "org2", "alice/r1", "org1/r2", "org2/r3", "org1/r4"]
        );

        let edges: Vec<_> = graph
            .links
            .iter()
            .map(|l| (l.source.as_str(), l.target.as_str(), l.value))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("alice", "org1", 1.0),
                ("alice", "org2", 1.0),
                ("alice", "alice/r1", 2.0),
                ("org1", "org1/r2", 2.0),
                ("org2", "org2/r3", 2.0),
                ("org1", "org1/r4", 2.0),
            ]
        );
        assert_eq!(graph.metadata.total_orgs, 2);
        assert_eq!(graph.metadata.total_repos, 4);
    }

    #[test]
    fn test_every_non_root_node_has_one_parent() {
        let graph = GraphData::build("alice", &sample(), &BuildOptions::default());

        for node in graph.nodes.iter().skip(1) {
            let inbound = graph.inbound(&node.id);
            assert_eq!(inbound.len(), 1, "{} should have one parent", node.id);
            if node.kind == NodeKind::Org {
                assert_eq!(inbound[0].source, "alice");
            }
        }
        assert!(graph.inbound("alice").is_empty());
    }

    #[test]
    fn test_duplicate_records_keep_duplicate_nodes() {
        let records = vec![
            RepositoryRecord::new("alice", "r1", "alice"),
            RepositoryRecord::new("alice", "r1", "alice"),
        ];
        let graph = GraphData::build("alice", &records, &BuildOptions::default());
        assert_eq!(graph.nodes_of(NodeKind::Repo).count(), 2);

        let options = BuildOptions {
            dedup_repos: true,
            ..Default::default()
        };
        let graph = GraphData::build("alice", &records, &options);
        assert_eq!(graph.nodes_of(NodeKind::Repo).count(), 1);
        assert_eq!(graph.metadata.total_repos, 1);
    }

    #[test]
    fn test_commit_share_sizing() {
        let records = vec![
            RepositoryRecord::new("alice", "big", "alice").with_metric(Metric::CommitShare(80)),
            RepositoryRecord::new("alice", "none", "alice").with_metric(Metric::CommitShare(0)),
            RepositoryRecord::new("alice", "all", "alice").with_metric(Metric::CommitShare(100)),
        ];
        let options = BuildOptions {
            sizing: Sizing::CommitShare,
            ..Default::default()
        };
        let graph = GraphData::build("alice", &records, &options);

        let big = &graph.nodes[1];
        assert!((big.size - (15.0 + 81f64.ln() * 3.0)).abs() < 1e-9);
        assert_eq!(graph.nodes[2].size, 15.0);
        assert_eq!(graph.links[0].value, 4.0);
        assert_eq!(graph.links[1].value, 0.0);
        assert_eq!(graph.links[2].value, MAX_SHARE_WEIGHT);
        assert_eq!(big.tooltip.as_deref(), Some("80% of commits"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = sample();
        let a = GraphData::build("alice", &records, &BuildOptions::default());
        let b = GraphData::build("alice", &records, &BuildOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_yields_lone_user() {
        let graph = GraphData::build("alice", &[], &BuildOptions::default());
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].kind, NodeKind::User);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_serializes_in_d3_shape() {
        let records = vec![RepositoryRecord::new("org1", "r2", "alice")];
        let graph = GraphData::build("alice", &records, &BuildOptions::default());
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["nodes"][0]["type"], "user");
        assert_eq!(json["nodes"][1]["type"], "org");
        assert_eq!(json["nodes"][2]["fork"], false);
        assert_eq!(json["links"][1]["source"], "org1");
        assert!(json["nodes"][2].get("metric").is_none());
    }
}
