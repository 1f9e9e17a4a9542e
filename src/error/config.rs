//! Configuration error type.
//!
//! Everything here is raised at construction time. A client that holds a
//! `ClientConfig` has already passed validation; nothing defers a
//! credential check to first use.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base URL is not set")]
    MissingBaseUrl,

    #[error("base URL '{url}' must start with http:// or https://")]
    InvalidBaseUrl { url: String },

    #[error("access token is not set")]
    MissingAccessToken,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("could not determine the home directory")]
    NoHomeDirectory,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Short stable code for log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingBaseUrl => "E_CFG_URL_MISSING",
            ConfigError::InvalidBaseUrl { .. } => "E_CFG_URL_INVALID",
            ConfigError::MissingAccessToken => "E_CFG_TOKEN",
            ConfigError::ZeroTimeout => "E_CFG_TIMEOUT",
            ConfigError::NoHomeDirectory => "E_CFG_HOME",
            ConfigError::Io(_) => "E_CFG_IO",
            ConfigError::Parse(_) => "E_CFG_PARSE",
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::MissingBaseUrl => {
                "No server address configured. Set WEFT_BASE_URL or add base_url to ~/.weft/config.json.".to_string()
            }
            ConfigError::InvalidBaseUrl { url } => {
                format!("'{}' is not a valid server address; it must start with http:// or https://.", url)
            }
            ConfigError::MissingAccessToken => {
                "No access token configured. Set WEFT_ACCESS_TOKEN or add access_token to ~/.weft/config.json.".to_string()
            }
            other => other.to_string(),
        }
    }
}
