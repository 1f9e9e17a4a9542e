//! Client configuration.
//!
//! Configuration comes from three places, in increasing precedence:
//! built-in defaults, the config file at `~/.weft/config.json`, and
//! `WEFT_*` environment variables. Validation runs once, up front, when
//! a client is constructed; nothing defers a credential check to first
//! use.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The config directory name under the home directory.
const CONFIG_DIR: &str = ".weft";

/// The config file name.
const CONFIG_FILE: &str = "config.json";

/// Default request timeout for REST calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to a Loom backend.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::default()
///     .with_base_url("https://loom.example")
///     .with_access_token(token);
/// let client = LoomClient::new(config)?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Server root, scheme included, e.g. `https://loom.example`
    pub base_url: String,
    /// Bearer token sent on every authenticated request
    pub access_token: String,
    /// Timeout applied to REST calls (not to streaming reads)
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Tracing filter for the binary, e.g. `weft=debug`
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            access_token: String::new(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_filter: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server root URL (builder pattern).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token (builder pattern).
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    /// Set the REST request timeout (builder pattern).
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the tracing filter for the binary (builder pattern).
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Path to the config file, `~/.weft/config.json`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load settings from the config file, or defaults if it does not
    /// exist. A file that exists but cannot be read or parsed is an
    /// error rather than a silent fallback.
    pub fn from_file() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(&path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Overlay `WEFT_*` environment variables onto these settings.
    ///
    /// Recognized: `WEFT_BASE_URL`, `WEFT_ACCESS_TOKEN`,
    /// `WEFT_TIMEOUT_SECS`, `WEFT_LOG`. Unset variables leave the
    /// existing value; an unparsable timeout is ignored.
    pub fn overlay_env(mut self) -> Self {
        if let Ok(url) = std::env::var("WEFT_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(token) = std::env::var("WEFT_ACCESS_TOKEN") {
            self.access_token = token;
        }
        if let Ok(secs) = std::env::var("WEFT_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.request_timeout_secs = secs;
            }
        }
        if let Ok(filter) = std::env::var("WEFT_LOG") {
            self.log_filter = Some(filter);
        }
        self
    }

    /// Load the effective configuration: file first, environment on top.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::from_file()?.overlay_env())
    }

    /// Check the settings are usable.
    ///
    /// Rejects an empty or schemeless base URL, an empty access token,
    /// and a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
            });
        }
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ClientConfig {
        ClientConfig::new()
            .with_base_url("https://loom.example")
            .with_access_token("tok-123")
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.access_token.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let config = valid()
            .with_request_timeout_secs(90)
            .with_log_filter("weft=debug");

        assert_eq!(config.base_url, "https://loom.example");
        assert_eq!(config.request_timeout_secs, 90);
        assert_eq!(config.log_filter.as_deref(), Some("weft=debug"));
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let config = valid().with_base_url("");
        assert!(matches!(config.validate(), Err(ConfigError::MissingBaseUrl)));

        let config = valid().with_base_url("   ");
        assert!(matches!(config.validate(), Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn test_validate_rejects_schemeless_base_url() {
        let config = valid().with_base_url("loom.example");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let config = valid().with_base_url("ftp://loom.example");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let config = valid().with_access_token("  ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingAccessToken)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = valid().with_request_timeout_secs(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = valid().with_log_filter("info");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_file_defaults_missing_fields() {
        // Older config files carry only the URL and token
        let json = r#"{"base_url": "https://loom.example", "access_token": "tok"}"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.log_filter, None);
    }
}
