use crate::source::Source;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "linkrepo")]
#[command(about = "Explore a GitHub user's repositories as a force-directed graph")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding .linkrepo.toml (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    /// GitHub token sent with every request
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch one user's repositories and render the graph
    Graph(GraphArgs),

    /// Browse GitHub through a local proxy that adds the graph tab to profiles
    Proxy(ProxyArgs),

    /// Generate a starter .linkrepo.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    /// GitHub username
    pub user: String,

    /// Where to read repositories from
    #[arg(short, long, value_enum, default_value_t = Source::Listing)]
    pub source: Source,

    /// Start HTTP server for interactive visualization
    #[arg(long)]
    pub serve: bool,

    /// Port for HTTP server (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Export graph as static HTML file instead of serving
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print graph JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Maximum repository pages to walk (at most 15)
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Collapse repeated repositories into one node
    #[arg(long)]
    pub dedup: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProxyArgs {
    /// Port for the proxy (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Source used by the graph tab unless the URL picks one
    #[arg(short, long, value_enum, default_value_t = Source::Listing)]
    pub source: Source,

    /// Profile to open in the browser on start
    #[arg(long)]
    pub user: Option<String>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .linkrepo.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}
