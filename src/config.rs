use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".linkrepo.toml";

/// Hard ceiling on sequential listing requests against github.com.
pub const MAX_PAGES: u32 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub github: GithubSettings,
    pub max_pages: u32,
    pub apply_event_cutoff: bool,
    pub dedup_repos: bool,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GithubSettings {
    pub web_url: String,
    pub api_url: String,
    pub user_agent: String,
    /// Request timeout; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    github: Option<RawGithub>,
    fetch: Option<RawFetch>,
    events: Option<RawEvents>,
    graph: Option<RawGraph>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawGithub {
    web_url: Option<String>,
    api_url: Option<String>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFetch {
    max_pages: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawEvents {
    apply_cutoff: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    dedup_repos: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GithubSettings::default(),
            max_pages: MAX_PAGES,
            apply_event_cutoff: false,
            dedup_repos: false,
            port: 3000,
        }
    }
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            web_url: "https://github.com".to_string(),
            api_url: "https://api.github.com".to_string(),
            user_agent: format!("linkrepo/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

impl Config {
    /// Load `.linkrepo.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let github = match raw.github {
            Some(g) => GithubSettings {
                web_url: trim_slash(g.web_url.unwrap_or(defaults.github.web_url)),
                api_url: trim_slash(g.api_url.unwrap_or(defaults.github.api_url)),
                user_agent: g.user_agent.unwrap_or(defaults.github.user_agent),
                timeout: None,
            },
            None => defaults.github,
        };

        let (max_pages, timeout) = match raw.fetch {
            Some(f) => (
                f.max_pages.map_or(MAX_PAGES, clamp_pages),
                f.timeout_secs.map(Duration::from_secs),
            ),
            None => (MAX_PAGES, None),
        };

        Ok(Self {
            github: GithubSettings { timeout, ..github },
            max_pages,
            apply_event_cutoff: raw
                .events
                .and_then(|e| e.apply_cutoff)
                .unwrap_or(defaults.apply_event_cutoff),
            dedup_repos: raw
                .graph
                .and_then(|g| g.dedup_repos)
                .unwrap_or(defaults.dedup_repos),
            port: raw.server.and_then(|s| s.port).unwrap_or(defaults.port),
        })
    }
}

/// Page caps may be lowered but never raised past `MAX_PAGES`.
pub fn clamp_pages(requested: u32) -> u32 {
    requested.clamp(1, MAX_PAGES)
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

pub fn generate_config_template() -> String {
    format!(
        r#"# linkrepo configuration

[github]
# web_url = "https://github.com"
# api_url = "https://api.github.com"
# user_agent = "linkrepo"

[fetch]
# Repository tab pages to walk before giving up (1-{max})
max_pages = {max}
# timeout_secs = 30

[events]
# Drop events older than one month instead of trusting the API's recency
apply_cutoff = false

[graph]
# Collapse repeated owner/name records into a single node
dedup_repos = false

[server]
port = 3000
"#,
        max = MAX_PAGES
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trips_to_defaults() {
        let config = Config::from_toml(&generate_config_template()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_merges_over_defaults() {
        let config = Config::from_toml(
            r#"
[github]
web_url = "http://localhost:8080/"

[fetch]
max_pages = 99
timeout_secs = 5

[graph]
dedup_repos = true
"#,
        )
        .unwrap();

        assert_eq!(config.github.web_url, "http://localhost:8080");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_pages, MAX_PAGES);
        assert!(config.dedup_repos);
        assert!(!config.apply_event_cutoff);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(
            Config::from_toml("[fetch\nmax_pages = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_clamp_pages() {
        assert_eq!(clamp_pages(0), 1);
        assert_eq!(clamp_pages(4), 4);
        assert_eq!(clamp_pages(40), MAX_PAGES);
    }
}
