//! The tool's full-page view, described as data and rendered in one place.

use super::mode::TOOL_SUFFIX;
use crate::graph::GraphData;
use crate::graph::assets::{D3_URL, SCRIPT, STYLE};
use serde::Serialize;

/// Everything the overlay needs to draw itself.
#[derive(Debug, Clone)]
pub struct ToolView {
    pub username: String,
    pub title: String,
    pub close_href: String,
    pub loading_text: String,
    pub content: ViewContent,
}

/// Where the graph comes from once the page is loaded.
#[derive(Debug, Clone)]
pub enum ViewContent {
    /// Fetch the graph from the server, polling the status endpoint meanwhile.
    Live {
        graph_url: String,
        status_url: String,
    },
    /// Graph data baked into the page.
    Embedded(Box<GraphData>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientConfig<'a> {
    close_href: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    graph_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a GraphData>,
}

impl ToolView {
    /// View served at `/<user>/linkrepo`, fed by `graph_url`.
    pub fn live(
        username: &str,
        title: String,
        loading_text: &str,
        graph_url: String,
        status_url: String,
    ) -> Self {
        Self {
            username: username.to_string(),
            title,
            close_href: format!("/{}", username),
            loading_text: loading_text.to_string(),
            content: ViewContent::Live {
                graph_url,
                status_url,
            },
        }
    }

    /// Self-contained page for an already built graph.
    pub fn embedded(graph: GraphData) -> Self {
        let username = graph.metadata.username.clone();
        Self {
            close_href: format!("https://github.com/{}", username),
            title: graph.metadata.title.clone(),
            loading_text: "Rendering...".to_string(),
            username,
            content: ViewContent::Embedded(Box::new(graph)),
        }
    }

    /// Path the navigation link points to.
    pub fn path_for(username: &str) -> String {
        format!("/{}{}", username, TOOL_SUFFIX)
    }

    pub fn render(&self) -> Result<String, serde_json::Error> {
        let config = match &self.content {
            ViewContent::Live {
                graph_url,
                status_url,
            } => ClientConfig {
                close_href: &self.close_href,
                graph_url: Some(graph_url.as_str()),
                status_url: Some(status_url.as_str()),
                data: None,
            },
            ViewContent::Embedded(graph) => ClientConfig {
                close_href: &self.close_href,
                graph_url: None,
                status_url: None,
                data: Some(graph.as_ref()),
            },
        };
        let config_json = script_safe(&serde_json::to_string(&config)?);

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{d3}"></script>
    <style>{style}</style>
</head>
<body>
    <div id="graph-app">
        <div id="graph-header">
            <h2 id="graph-title">{title}</h2>
            <button id="graph-close">✕ Close</button>
        </div>
        <div id="graph-container">
            <div class="loading">{loading}</div>
        </div>
    </div>
    <script type="application/json" id="linkrepo-config">{config}</script>
    <script>{script}</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            loading = escape_html(&self.loading_text),
            d3 = D3_URL,
            style = STYLE,
            config = config_json,
            script = SCRIPT,
        ))
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Keep JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BuildOptions;
    use crate::model::RepositoryRecord;
    use scraper::{Html, Selector};

    fn live() -> ToolView {
        ToolView::live(
            "alice",
            "Repository Link Graph: alice".to_string(),
            "Preparing to load repositories...",
            "/api/users/alice/graph?source=listing".to_string(),
            "/api/users/alice/status".to_string(),
        )
    }

    #[test]
    fn test_overlay_scaffold_ids() {
        let html = live().render().unwrap();
        let doc = Html::parse_document(&html);

        for css in ["#graph-app", "#graph-header", "#graph-title", "#graph-close", "#graph-container", ".loading"] {
            let sel = Selector::parse(css).unwrap();
            assert!(doc.select(&sel).next().is_some(), "missing {}", css);
        }

        let loading = Selector::parse(".loading").unwrap();
        let text: String = doc.select(&loading).next().unwrap().text().collect();
        assert_eq!(text, "Preparing to load repositories...");
    }

    #[test]
    fn test_live_config_points_at_endpoints() {
        let html = live().render().unwrap();
        assert!(html.contains(r#""closeHref":"/alice""#));
        assert!(html.contains(r#""statusUrl":"/api/users/alice/status""#));
        assert!(!html.contains(r#""data""#));
    }

    #[test]
    fn test_embedded_graph_is_script_safe() {
        let records = vec![RepositoryRecord::new("alice", "</script><b>", "alice")];
        let options = BuildOptions {
            title: "<Graph>".to_string(),
            ..Default::default()
        };
        let graph = GraphData::build("alice", &records, &options);

        let html = ToolView::embedded(graph).render().unwrap();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("&lt;Graph&gt;"));
        assert!(html.contains(r#""data":{"#));
    }

    #[test]
    fn test_path_for() {
        assert_eq!(ToolView::path_for("alice"), "/alice/linkrepo");
    }
}
