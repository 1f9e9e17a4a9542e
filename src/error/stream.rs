//! Stream-level error types.
//!
//! Terminal conditions for an event stream. Per-block decode problems
//! are not errors at this level: the parser logs and drops those without
//! ending the stream. What lands here kills the stream.

use std::fmt;

use super::api::ApiError;
use super::network::NetworkError;

/// Conditions that terminate an event stream.
#[derive(Debug, Clone)]
pub enum StreamError {
    /// The byte stream failed mid-flight.
    Transport { source: NetworkError },

    /// The server refused the stream request outright.
    Rejected { source: ApiError },

    /// The buffer grew past its cap without producing a delimiter,
    /// which means the peer is not speaking the event protocol.
    BufferExceeded { limit: usize },
}

impl StreamError {
    /// Whether reconnecting with a fresh reader could plausibly work.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Transport { source } => source.is_retryable(),
            StreamError::Rejected { source } => source.is_retryable(),
            StreamError::BufferExceeded { .. } => false,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport { source } => source.user_message(),
            StreamError::Rejected { source } => source.user_message(),
            StreamError::BufferExceeded { .. } => {
                "The server sent an unreadable response stream.".to_string()
            }
        }
    }

    /// Short stable code for log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::Rejected { .. } => "E_STREAM_REJECTED",
            StreamError::BufferExceeded { .. } => "E_STREAM_BUFFER",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Transport { source } => {
                write!(f, "stream transport failed: {}", source)
            }
            StreamError::Rejected { source } => {
                write!(f, "stream request rejected: {}", source)
            }
            StreamError::BufferExceeded { limit } => {
                write!(f, "stream buffer exceeded {} bytes without a delimiter", limit)
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Transport { source } => Some(source),
            StreamError::Rejected { source } => Some(source),
            StreamError::BufferExceeded { .. } => None,
        }
    }
}

impl From<NetworkError> for StreamError {
    fn from(source: NetworkError) -> Self {
        StreamError::Transport { source }
    }
}

impl From<ApiError> for StreamError {
    fn from(source: ApiError) -> Self {
        StreamError::Rejected { source }
    }
}
