use crate::cli::GraphArgs;
use crate::config::{Config, clamp_pages};
use crate::fetch::Fetcher;
use crate::fs::{FileSystem, default_fs};
use crate::graph::{GraphData, NodeKind};
use crate::pipeline::{Pipeline, Progress};
use crate::style;

use super::{CommandContext, runtime};

/// Loading indicator for the terminal.
struct TerminalProgress;

impl Progress for TerminalProgress {
    fn update(&self, text: &str) {
        style::status(text);
    }
}

pub fn cmd_graph(args: GraphArgs, ctx: CommandContext) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let config = apply_overrides(ctx.config, &args);
    let graph_data = match rt.block_on(build_graph(&args, &config, &ctx.fetcher)) {
        Some(data) => data,
        None => return 1,
    };

    if args.serve {
        let port = args.port.unwrap_or(config.port);
        if let Err(e) = rt.block_on(crate::graph::serve(graph_data, port, args.open)) {
            style::error(&format!("Server failed: {}", e));
            return 1;
        }
        return 0;
    }

    emit(&args, &graph_data, default_fs())
}

fn apply_overrides(mut config: Config, args: &GraphArgs) -> Config {
    if let Some(pages) = args.max_pages {
        config.max_pages = clamp_pages(pages);
    }
    if args.dedup {
        config.dedup_repos = true;
    }
    config
}

async fn build_graph<F: Fetcher>(args: &GraphArgs, config: &Config, fetcher: &F) -> Option<GraphData> {
    let today = chrono::Utc::now().date_naive();
    let pipeline = Pipeline::new(&args.user, args.source, config, today);

    match pipeline.run(fetcher, &TerminalProgress).await {
        Ok(data) => Some(data),
        Err(e) => {
            style::error(&e.to_string());
            None
        }
    }
}

/// Write the graph out as JSON, as static HTML, or as a terminal summary.
fn emit(args: &GraphArgs, graph_data: &GraphData, fs: &dyn FileSystem) -> i32 {
    if args.json {
        return match serde_json::to_string_pretty(graph_data) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(e) => {
                style::error(&format!("Failed to serialize graph: {}", e));
                1
            }
        };
    }

    if let Some(export_path) = &args.export {
        let html = match crate::graph::generate_static_html(graph_data) {
            Ok(html) => html,
            Err(e) => {
                style::error(&format!("Failed to render graph: {}", e));
                return 1;
            }
        };
        if let Err(e) = fs.write(export_path, &html) {
            style::error(&format!("Failed to write export file: {}", e));
            return 1;
        }
        style::success(&format!("Graph exported to: {}", style::path(export_path)));
        return 0;
    }

    print_summary(graph_data);
    style::hint("Use --serve to open the interactive graph, --export to save HTML, or --json");
    0
}

fn print_summary(graph_data: &GraphData) {
    style::section(&graph_data.metadata.title);
    println!("{}", style::metric("Repositories", graph_data.metadata.total_repos));
    println!("{}", style::metric("Organizations", graph_data.metadata.total_orgs));
    let forks = graph_data
        .nodes_of(NodeKind::Repo)
        .filter(|n| n.fork == Some(true))
        .count();
    println!("{}", style::metric("Forks", forks));
}
