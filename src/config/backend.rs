//! Backend Configuration
//!
//! Defines the configuration schema for the chat backend endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Environment variable consulted for a base URL override by default
pub const DEFAULT_BASE_URL_ENV: &str = "CHATSTREAM_BASE_URL";

/// Resolved backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chat backend
    pub base_url: String,

    /// Path of the streaming query endpoint
    pub query_path: String,

    /// Path of the health endpoint
    pub status_path: String,

    /// Environment variable that overrides `base_url` when set
    #[serde(
        default = "default_base_url_env",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url_env: Option<String>,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Abort a stream that delivers nothing for this many seconds (unset: wait forever)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,

    /// Additional headers to send with requests
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

fn default_base_url_env() -> Option<String> {
    Some(DEFAULT_BASE_URL_ENV.to_string())
}

/// A partial configuration read from a file; unset fields keep earlier values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl BackendConfig {
    /// Apply overrides on top of this config (headers merge by key)
    pub fn apply(&mut self, overrides: BackendOverrides) {
        if let Some(v) = overrides.base_url {
            self.base_url = v;
        }
        if let Some(v) = overrides.query_path {
            self.query_path = v;
        }
        if let Some(v) = overrides.status_path {
            self.status_path = v;
        }
        if let Some(v) = overrides.base_url_env {
            self.base_url_env = Some(v);
        }
        if let Some(v) = overrides.connect_timeout_secs {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = overrides.idle_timeout_secs {
            self.idle_timeout_secs = Some(v);
        }
        self.headers.extend(overrides.headers);
    }

    /// Get the effective base URL (from env var if configured, otherwise default)
    pub fn get_base_url(&self) -> String {
        if let Some(env_var) = &self.base_url_env {
            if let Ok(url) = std::env::var(env_var) {
                if !url.is_empty() {
                    return url;
                }
            }
        }
        self.base_url.clone()
    }

    /// Full URL of the streaming query endpoint
    pub fn query_url(&self) -> String {
        join_url(&self.get_base_url(), &self.query_path)
    }

    /// Full URL of the health endpoint
    pub fn status_url(&self) -> String {
        join_url(&self.get_base_url(), &self.status_path)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BackendConfig {
        BackendConfig {
            base_url: "http://127.0.0.1:8001/".to_string(),
            query_path: "/api/query".to_string(),
            status_path: "status".to_string(),
            base_url_env: None,
            connect_timeout_secs: 10,
            idle_timeout_secs: None,
            headers: HashMap::new(),
        }
    }

    #[test]
    fn test_urls_join_cleanly() {
        let config = sample();
        assert_eq!(config.query_url(), "http://127.0.0.1:8001/api/query");
        assert_eq!(config.status_url(), "http://127.0.0.1:8001/status");
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = sample();
        let overrides: BackendOverrides = serde_json::from_str(
            r#"{
                "base_url": "https://chat.example.com",
                "idle_timeout_secs": 30,
                "headers": {"x-team": "docs"}
            }"#,
        )
        .unwrap();

        config.apply(overrides);

        assert_eq!(config.base_url, "https://chat.example.com");
        assert_eq!(config.query_path, "/api/query");
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.headers.get("x-team"), Some(&"docs".to_string()));
    }

    #[test]
    fn test_unknown_override_field_is_rejected() {
        let result = serde_json::from_str::<BackendOverrides>(r#"{"base_ur": "typo"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_env_override() {
        let mut config = sample();
        config.base_url_env = Some("CHATSTREAM_TEST_BASE_URL_OVERRIDE".to_string());

        std::env::set_var("CHATSTREAM_TEST_BASE_URL_OVERRIDE", "http://override:9000");
        assert_eq!(config.query_url(), "http://override:9000/api/query");

        std::env::remove_var("CHATSTREAM_TEST_BASE_URL_OVERRIDE");
        assert_eq!(config.get_base_url(), "http://127.0.0.1:8001/");
    }
}
