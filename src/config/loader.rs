//! Configuration Loader
//!
//! Handles loading and merging backend configuration from multiple sources.

use crate::config::backend::{BackendConfig, BackendOverrides};
use crate::error::{ChatStreamError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an extra config file
pub const CONFIG_PATH_ENV: &str = "CHATSTREAM_CONFIG_PATH";

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    config: BackendConfig,
}

impl ConfigLoader {
    /// Create a new config loader and load from default locations
    pub fn new() -> Result<Self> {
        let mut loader = Self::builtin()?;

        // Then load from file system (can override built-ins)
        loader.load_from_default_paths()?;

        Ok(loader)
    }

    /// Create a loader with a specific config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut loader = Self::builtin()?;
        loader.load_from_file(path)?;
        Ok(loader)
    }

    /// Built-in defaults only
    pub fn builtin() -> Result<Self> {
        let defaults = include_str!("../../defaults.json");
        let config: BackendConfig = serde_json::from_str(defaults).map_err(|e| {
            ChatStreamError::Config(format!("Failed to parse built-in defaults.json: {}", e))
        })?;

        Ok(Self { config })
    }

    /// Load configuration from default paths
    fn load_from_default_paths(&mut self) -> Result<()> {
        for path in Self::get_config_paths() {
            if path.exists() {
                self.load_from_file(&path)?;
            }
        }

        Ok(())
    }

    /// Get list of config paths to check, lowest precedence first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".chatstream").join("config.json"));
        }

        // 2. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("chatstream").join("config.json"));
        }

        // 3. Current directory
        paths.push(PathBuf::from("chatstream.json"));

        // 4. Environment variable
        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(custom_path));
        }

        paths
    }

    /// Load configuration from a specific file
    fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatStreamError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let overrides: BackendOverrides = serde_json::from_str(&content).map_err(|e| {
            ChatStreamError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loaded config overrides");
        self.config.apply(overrides);
        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> BackendConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::backend::DEFAULT_BASE_URL_ENV;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_builtin_defaults() {
        let loader = ConfigLoader::builtin().unwrap();
        let config = loader.config();
        assert_eq!(config.base_url, "http://127.0.0.1:8001");
        assert_eq!(config.query_path, "/api/query");
        assert_eq!(config.status_path, "/status");
        assert_eq!(config.idle_timeout(), None);
    }

    #[test]
    fn test_base_url_env_defaults_when_omitted() {
        let config = ConfigLoader::builtin().unwrap().into_config();
        assert_eq!(config.base_url_env.as_deref(), Some(DEFAULT_BASE_URL_ENV));

        let config: BackendConfig = serde_json::from_str(
            r#"{
                "base_url": "http://localhost:1",
                "query_path": "/q",
                "status_path": "/s",
                "connect_timeout_secs": 1
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_url_env.as_deref(), Some(DEFAULT_BASE_URL_ENV));
    }

    #[test]
    fn test_load_from_custom_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "base_url": "https://chat.internal:8443",
                "connect_timeout_secs": 3
            }}"#
        )
        .unwrap();

        let config = ConfigLoader::from_path(file.path()).unwrap().into_config();
        assert_eq!(config.base_url, "https://chat.internal:8443");
        assert_eq!(config.connect_timeout_secs, 3);
        // untouched fields keep built-in values
        assert_eq!(config.query_path, "/api/query");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();

        let err = ConfigLoader::from_path(file.path()).err().unwrap();
        assert!(matches!(err, ChatStreamError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::from_path(dir.path().join("absent.json"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to read"));
    }
}
