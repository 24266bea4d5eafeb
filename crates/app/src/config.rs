//! Client configuration
//!
//! Loaded from `config.toml` in the platform config directory (or an
//! explicit path), then overridden by `HUDDLE_*` environment variables.
//! CLI flags are applied last in `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `server`
pub const ENV_SERVER: &str = "HUDDLE_SERVER";
/// Environment variable overriding `api_base`
pub const ENV_API_BASE: &str = "HUDDLE_API_BASE";
/// Environment variable overriding `display_name`
pub const ENV_NAME: &str = "HUDDLE_NAME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Event connection address (`host:port`)
    pub server: String,
    /// Base URL of the room-creation API
    pub api_base: String,
    /// Default display name when `--name` is not given
    pub display_name: Option<String>,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: format!("127.0.0.1:{}", huddle_net::DEFAULT_PORT),
            api_base: "http://localhost:3000".to_string(),
            display_name: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_path(),
        };

        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(ENV_SERVER) {
            self.server = server;
        }
        if let Some(api_base) = lookup(ENV_API_BASE) {
            self.api_base = api_base;
        }
        if let Some(name) = lookup(ENV_NAME) {
            self.display_name = Some(name);
        }
    }
}

/// `config.toml` in the platform config directory
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "onyx", "huddle").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::from_file(&missing).is_err());

        let config = AppConfig::load(Some(missing.as_path())).unwrap();
        assert_eq!(config.log_filter, AppConfig::default().log_filter);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server = \"chat.example:4000\"").unwrap();
        writeln!(file, "display_name = \"Ann\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server, "chat.example:4000");
        assert_eq!(config.display_name.as_deref(), Some("Ann"));
        assert_eq!(config.api_base, AppConfig::default().api_base);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server = [").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_SERVER, "10.0.0.2:3001"), (ENV_NAME, "Ben")]
            .into_iter()
            .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server, "10.0.0.2:3001");
        assert_eq!(config.display_name.as_deref(), Some("Ben"));
        assert_eq!(config.api_base, AppConfig::default().api_base);
    }
}
