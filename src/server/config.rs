//! Application configuration types
//!
//! Contains all configuration structures for cmdterm.

use anyhow::{Context, Result};
use cmdterm_core::{EngineConfig, EngineSettings, Profile};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub repl: ReplConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Force a profile chosen on the command line
    pub fn with_profile(mut self, profile: Option<Profile>) -> Self {
        if let Some(profile) = profile {
            self.engine.profile = profile;
        }
        self
    }

    /// Resolved engine configuration
    pub fn engine_config(&self) -> EngineConfig {
        self.engine.resolve()
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Permissive CORS for browser front ends
    #[serde(default = "default_true")]
    pub cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: true,
        }
    }
}

/// Interactive REPL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Line-editor history file; `~` expands to the home directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<String>,
    /// Lines kept in the history file
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Prompt paths longer than this are shortened
    #[serde(default = "default_prompt_width")]
    pub prompt_width: usize,
}

fn default_history_limit() -> usize {
    1000
}

fn default_prompt_width() -> usize {
    40
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_file: Some("~/.cmdterm_history".to_string()),
            history_limit: default_history_limit(),
            prompt_width: default_prompt_width(),
        }
    }
}

impl ReplConfig {
    /// History file path with `~` expanded
    pub fn history_path(&self) -> Option<PathBuf> {
        let raw = self.history_file.as_deref().filter(|p| !p.is_empty())?;
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(raw)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::loader::DEFAULT_CONFIG;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.engine.profile, Profile::Full);
        assert_eq!(config.repl.history_limit, 1000);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_profile_override() {
        let config = AppConfig::default().with_profile(Some(Profile::Restricted));
        assert!(config.engine_config().is_simulated());

        let config = config.with_profile(None);
        assert_eq!(config.engine.profile, Profile::Restricted);
    }

    #[test]
    fn test_history_path_expands_home() {
        let repl = ReplConfig::default();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(repl.history_path(), Some(home.join(".cmdterm_history")));
        }

        let none = ReplConfig {
            history_file: Some(String::new()),
            ..ReplConfig::default()
        };
        assert_eq!(none.history_path(), None);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert!(text.contains("[engine]"));
    }
}
