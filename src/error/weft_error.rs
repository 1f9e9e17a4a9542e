//! Unified error type for the weft client.
//!
//! `WeftError` folds the domain errors into one enum so library entry
//! points can return a single type, while callers who care can still
//! match on the domain.

use std::fmt;

use super::api::ApiError;
use super::config::ConfigError;
use super::network::{classify_reqwest_error, NetworkError};
use super::stream::StreamError;

/// Result alias used across the crate.
pub type WeftResult<T> = Result<T, WeftError>;

/// Any failure the client can report.
#[derive(Debug)]
pub enum WeftError {
    /// Connection, DNS, TLS, timeout, body-decode failures.
    Network(NetworkError),

    /// Non-success HTTP responses from the backend.
    Api(ApiError),

    /// Terminal event-stream conditions.
    Stream(StreamError),

    /// Invalid or missing configuration, caught at construction.
    Config(ConfigError),
}

impl WeftError {
    /// Whether retrying the operation could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeftError::Network(err) => err.is_retryable(),
            WeftError::Api(err) => err.is_retryable(),
            WeftError::Stream(err) => err.is_retryable(),
            WeftError::Config(_) => false,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            WeftError::Network(err) => err.user_message(),
            WeftError::Api(err) => err.user_message(),
            WeftError::Stream(err) => err.user_message(),
            WeftError::Config(err) => err.user_message(),
        }
    }

    /// Short stable code for log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            WeftError::Network(err) => err.error_code(),
            WeftError::Api(err) => err.error_code(),
            WeftError::Stream(err) => err.error_code(),
            WeftError::Config(err) => err.error_code(),
        }
    }

    /// Whether the backend rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            WeftError::Api(err) => err.is_auth_failure(),
            WeftError::Stream(StreamError::Rejected { source }) => source.is_auth_failure(),
            _ => false,
        }
    }
}

impl fmt::Display for WeftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeftError::Network(err) => write!(f, "{}", err),
            WeftError::Api(err) => write!(f, "{}", err),
            WeftError::Stream(err) => write!(f, "{}", err),
            WeftError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for WeftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeftError::Network(err) => Some(err),
            WeftError::Api(err) => Some(err),
            WeftError::Stream(err) => Some(err),
            WeftError::Config(err) => Some(err),
        }
    }
}

impl From<NetworkError> for WeftError {
    fn from(err: NetworkError) -> Self {
        WeftError::Network(err)
    }
}

impl From<ApiError> for WeftError {
    fn from(err: ApiError) -> Self {
        WeftError::Api(err)
    }
}

impl From<StreamError> for WeftError {
    fn from(err: StreamError) -> Self {
        WeftError::Stream(err)
    }
}

impl From<ConfigError> for WeftError {
    fn from(err: ConfigError) -> Self {
        WeftError::Config(err)
    }
}

// Fallback for reqwest errors that escape without URL context; call sites
// in the client prefer classify_reqwest_error directly so the URL and
// timeout survive.
impl From<reqwest::Error> for WeftError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        WeftError::Network(classify_reqwest_error(&err, &url, 0))
    }
}
