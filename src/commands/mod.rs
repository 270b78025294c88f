mod graph;
mod init;
mod proxy;

pub use graph::cmd_graph;
pub use init::cmd_init;
pub use proxy::cmd_proxy;

use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::style;
use std::path::Path;

/// Shared setup for commands that talk to GitHub.
pub struct CommandContext {
    pub config: Config,
    pub fetcher: HttpFetcher,
}

impl CommandContext {
    /// Load config and build the HTTP client.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(config_dir: &Path, token: Option<String>) -> Result<Self, i32> {
        let config = Config::load(config_dir).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        let fetcher = match HttpFetcher::new(&config.github.user_agent, config.github.timeout) {
            Ok(f) => f.with_token(token),
            Err(e) => {
                style::error(&format!("Could not create HTTP client: {}", e));
                return Err(1);
            }
        };

        Ok(Self { config, fetcher })
    }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, i32> {
    tokio::runtime::Runtime::new().map_err(|e| {
        style::error(&format!("Failed to start async runtime: {}", e));
        1
    })
}
