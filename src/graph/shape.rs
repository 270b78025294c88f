//! Structural checks over built graph data.

use super::data::{GraphData, NodeKind};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("Expected exactly one user node, found {0}")]
    UserCount(usize),
    #[error("Link references unknown node: {0}")]
    DanglingLink(String),
    #[error("Node {id} has {count} inbound links")]
    ParentCount { id: String, count: usize },
    #[error("Graph contains a cycle")]
    Cycle,
}

/// Index the graph with petgraph, keyed by node id.
///
/// Repeated ids collapse onto their first occurrence, mirroring how the
/// browser keys nodes by id.
pub fn to_digraph(data: &GraphData) -> Result<DiGraph<String, f64>, ShapeError> {
    let mut graph = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &data.nodes {
        indices
            .entry(node.id.as_str())
            .or_insert_with(|| graph.add_node(node.id.clone()));
    }

    for link in &data.links {
        let from = indices
            .get(link.source.as_str())
            .ok_or_else(|| ShapeError::DanglingLink(link.source.clone()))?;
        let to = indices
            .get(link.target.as_str())
            .ok_or_else(|| ShapeError::DanglingLink(link.target.clone()))?;
        graph.add_edge(*from, *to, link.value);
    }

    Ok(graph)
}

/// Verify the graph is a tree rooted at a single user node where every
/// other node has exactly one parent.
pub fn check_tree(data: &GraphData) -> Result<(), ShapeError> {
    let users = data.nodes_of(NodeKind::User).count();
    if users != 1 {
        return Err(ShapeError::UserCount(users));
    }

    let graph = to_digraph(data)?;
    if is_cyclic_directed(&graph) {
        return Err(ShapeError::Cycle);
    }

    for node in &data.nodes {
        let count = data.inbound(&node.id).len();
        let expected = usize::from(node.kind != NodeKind::User);
        if count != expected {
            return Err(ShapeError::ParentCount {
                id: node.id.clone(),
                count,
            });
        }
    }

    Ok(())
}
