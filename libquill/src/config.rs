//! Configuration management for Quill

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Default backend location (the blog API listens on :8080)
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    pub path: String,
}

/// How long notifications stay on screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationConfig {
    #[serde(default = "default_success_secs")]
    pub success_secs: u64,
    #[serde(default = "default_error_secs")]
    pub error_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_success_secs() -> u64 {
    3
}

fn default_error_secs() -> u64 {
    5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/quill/session.json".to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_secs: default_success_secs(),
            error_secs: default_error_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from the default location, falling back to the
    /// built-in defaults when no config file exists yet
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", config_path);
            Ok(Self::default_config().with_env_overrides())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config.with_env_overrides())
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: default_timeout_secs(),
            },
            session: SessionConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }

    /// Apply `QUILL_API_URL` on top of whatever was loaded
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("QUILL_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        Ok(())
    }

    /// Request timeout for backend calls
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Session file location with `~` expanded
    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.session.path).to_string())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("QUILL_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("quill").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_full_config() {
        std::env::remove_var("QUILL_API_URL");
        let file = write_config(
            r#"
[api]
base_url = "https://blog.example.com/api"
timeout_secs = 30

[session]
path = "/tmp/quill-session.json"

[notifications]
success_secs = 2
error_secs = 8
"#,
        );

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://blog.example.com/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.session_path(), PathBuf::from("/tmp/quill-session.json"));
        assert_eq!(config.notifications.success_secs, 2);
        assert_eq!(config.notifications.error_secs, 8);
    }

    #[test]
    #[serial]
    fn test_optional_sections_use_defaults() {
        std::env::remove_var("QUILL_API_URL");
        let file = write_config(
            r#"
[api]
base_url = "http://localhost:9000/api"
"#,
        );

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.notifications.success_secs, 3);
    }

    #[test]
    fn test_missing_api_section_is_parse_error() {
        let file = write_config("[session]\npath = \"x\"\n");

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let file = write_config("[api]\nbase_url = \"  \"\n");

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    #[serial]
    fn test_env_override_for_api_url() {
        std::env::set_var("QUILL_API_URL", "http://override:1234/api");
        let config = Config::default_config().with_env_overrides();
        std::env::remove_var("QUILL_API_URL");

        assert_eq!(config.api.base_url, "http://override:1234/api");
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        std::env::set_var("QUILL_CONFIG", "/etc/quill/custom.toml");
        let path = resolve_config_path().unwrap();
        std::env::remove_var("QUILL_CONFIG");

        assert_eq!(path, PathBuf::from("/etc/quill/custom.toml"));
    }

    #[test]
    #[serial]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("QUILL_CONFIG", dir.path().join("missing.toml"));
        std::env::remove_var("QUILL_API_URL");
        let config = Config::load_or_default().unwrap();
        std::env::remove_var("QUILL_CONFIG");

        assert_eq!(config, Config::default_config());
    }
}
