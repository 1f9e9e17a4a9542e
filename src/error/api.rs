//! API-level error type.
//!
//! Raised when the backend answers with a non-success HTTP status.
//! The body text is captured best-effort because the backend puts its
//! `detail` field there.

use std::fmt;

/// A non-2xx response from the backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Response body text, usually a JSON object with a `detail` field.
    pub detail: String,
}

impl ApiError {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        self.status >= 500 || self.status == 429 || self.status == 408
    }

    /// Whether the token was rejected and a fresh sign-in is needed.
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self.status {
            400 => "The request was invalid.".to_string(),
            401 => "Your session has expired. Please sign in again.".to_string(),
            403 => "You don't have access to that conversation.".to_string(),
            404 => "That conversation or message no longer exists.".to_string(),
            429 => "Too many requests. Give it a moment and try again.".to_string(),
            500..=599 => "The server hit a problem. Please try again shortly.".to_string(),
            _ => format!("The server returned HTTP {}.", self.status),
        }
    }

    /// Short stable code for log lines.
    pub fn error_code(&self) -> &'static str {
        match self.status {
            401 => "E_API_AUTH",
            403 => "E_API_FORBIDDEN",
            404 => "E_API_NOT_FOUND",
            429 => "E_API_RATE",
            400..=499 => "E_API_CLIENT",
            500..=599 => "E_API_SERVER",
            _ => "E_API_STATUS",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "server returned HTTP {}", self.status)
        } else {
            write!(f, "server returned HTTP {}: {}", self.status, self.detail)
        }
    }
}

impl std::error::Error for ApiError {}
