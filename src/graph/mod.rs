pub mod assets;
mod data;
mod routes;
mod shape;

pub use data::{
    BuildOptions, GraphData, GraphLink, GraphMetadata, GraphNode, NodeKind, Sizing,
};
pub use routes::{ProxyState, StatusBoard, StatusSlot, proxy_router, rewrite_page, serve, serve_proxy};
pub use shape::{ShapeError, check_tree, to_digraph};

/// Self-contained HTML page for `graph`, for writing to disk.
pub fn generate_static_html(graph: &GraphData) -> Result<String, serde_json::Error> {
    crate::page::ToolView::embedded(graph.clone()).render()
}
