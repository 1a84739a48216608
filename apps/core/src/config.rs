use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_MARKER;

pub const SWITCH_TAB_COMMAND: &str = "switch-tab";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Host/path pair identifying a search results page whose `q` parameter may
/// carry a shortcut keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    pub host: String,
    #[serde(default)]
    pub path: String,
}

impl SearchEngine {
    pub fn new(host: &str, path: &str) -> Self {
        Self {
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    pub fn matches(&self, hostname: &str, pathname: &str) -> bool {
        hostname.contains(&self.host) && (self.path.is_empty() || pathname.contains(&self.path))
    }
}

/// Keyboard command that opens a fixed destination in a new tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTarget {
    pub id: String,
    pub url: String,
}

impl CommandTarget {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,
    pub shortcuts_path: PathBuf,
    pub state_db_path: PathBuf,
    pub log_dir: PathBuf,
    pub load_timeout_ms: u64,
    pub marker: char,
    pub task_host: String,
    pub task_scheme: String,
    pub search_engines: Vec<SearchEngine>,
    pub commands: Vec<CommandTarget>,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            config_path: base.join("config.toml"),
            shortcuts_path: base.join("shortcuts.json"),
            state_db_path: base.join("state.sqlite3"),
            log_dir: crate::logging::default_logs_dir(),
            load_timeout_ms: 5_000,
            marker: DEFAULT_MARKER,
            task_host: "app.todoist.com".to_string(),
            task_scheme: "todoist".to_string(),
            search_engines: vec![
                SearchEngine::new("google.com", "/search"),
                SearchEngine::new("bing.com", "/search"),
                SearchEngine::new("duckduckgo.com", ""),
            ],
            commands: vec![
                CommandTarget::new(
                    "open-drive-account-0",
                    "https://drive.google.com/drive/u/0/recent",
                ),
                CommandTarget::new(
                    "open-drive-account-3",
                    "https://drive.google.com/drive/u/3/recent",
                ),
                CommandTarget::new("open-calendar", "https://calendar.notion.so/"),
            ],
        }
    }
}

impl Config {
    pub fn command_url(&self, id: &str) -> Option<&str> {
        self.commands
            .iter()
            .find(|command| command.id == id)
            .map(|command| command.url.as_str())
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("omnijump")
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if !(100..=60_000).contains(&cfg.load_timeout_ms) {
        return Err("load_timeout_ms out of range".into());
    }

    if cfg.shortcuts_path.as_os_str().is_empty() {
        return Err("shortcuts_path is required".into());
    }

    if cfg.state_db_path.as_os_str().is_empty() {
        return Err("state_db_path is required".into());
    }

    if cfg.marker.is_alphanumeric() || cfg.marker.is_whitespace() {
        return Err("marker must be a symbol character".into());
    }

    if cfg.task_host.trim().is_empty() {
        return Err("task_host is required".into());
    }

    let scheme_ok = cfg
        .task_scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && cfg
            .task_scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return Err(format!("task_scheme is not a valid scheme: {}", cfg.task_scheme));
    }

    if cfg.search_engines.iter().any(|engine| engine.host.trim().is_empty()) {
        return Err("search engine host is required".into());
    }

    let mut seen = HashSet::new();
    for command in &cfg.commands {
        if command.id.trim().is_empty() || command.url.trim().is_empty() {
            return Err("command id and url are required".into());
        }
        if command.id == SWITCH_TAB_COMMAND {
            return Err(format!("command id is reserved: {SWITCH_TAB_COMMAND}"));
        }
        if !seen.insert(command.id.as_str()) {
            return Err(format!("duplicate command id: {}", command.id));
        }
    }

    Ok(())
}

pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    if !config_path.exists() {
        return Ok(Config {
            config_path,
            ..Config::default()
        });
    }

    let raw = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
        path: config_path.clone(),
        source,
    })?;
    let mut cfg: Config = toml::from_str(&raw)?;
    cfg.config_path = config_path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::SearchEngine;

    #[test]
    fn search_engine_without_path_matches_any_path() {
        let engine = SearchEngine::new("duckduckgo.com", "");
        assert!(engine.matches("duckduckgo.com", "/"));
        assert!(engine.matches("html.duckduckgo.com", "/html"));
        assert!(!engine.matches("example.com", "/"));
    }

    #[test]
    fn search_engine_with_path_requires_both() {
        let engine = SearchEngine::new("google.com", "/search");
        assert!(engine.matches("www.google.com", "/search"));
        assert!(!engine.matches("www.google.com", "/maps"));
    }
}
