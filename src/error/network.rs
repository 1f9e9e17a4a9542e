//! Network-level error types.
//!
//! Errors produced while establishing connections or moving bytes,
//! before any protocol-level interpretation happens.

use std::fmt;

/// Network-specific error variants.
///
/// These cover connection establishment, DNS, TLS, timeouts, and
/// response-body decoding, independent of what the bytes mean.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// The server could not be reached.
    ConnectionFailed { url: String, message: String },

    /// The server host name did not resolve.
    DnsFailure { host: String },

    /// The request exceeded the configured time limit.
    Timeout { operation: String, limit_secs: u64 },

    /// A secure connection could not be negotiated.
    Tls { message: String },

    /// The response body could not be read or decoded.
    BodyDecode { message: String },

    /// Anything reqwest reports that fits no bucket above.
    Other { message: String },
}

impl NetworkError {
    /// Whether the condition is plausibly transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::DnsFailure { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::Tls { .. } => false,
            NetworkError::BodyDecode { .. } => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to reach the server. Check your internet connection.".to_string()
            }
            NetworkError::DnsFailure { host } => {
                format!("Could not resolve '{}'. Check the server address and your DNS.", host)
            }
            NetworkError::Timeout { operation, limit_secs } => {
                format!(
                    "The {} took longer than {} seconds. The server may be overloaded.",
                    operation, limit_secs
                )
            }
            NetworkError::Tls { .. } => {
                "A secure connection could not be established.".to_string()
            }
            NetworkError::BodyDecode { .. } => {
                "The server response could not be read. Please try again.".to_string()
            }
            NetworkError::Other { message } => {
                format!("Network error: {}", message)
            }
        }
    }

    /// Short stable code for log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONNECT",
            NetworkError::DnsFailure { .. } => "E_NET_DNS",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::Tls { .. } => "E_NET_TLS",
            NetworkError::BodyDecode { .. } => "E_NET_DECODE",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "connection to '{}' failed: {}", url, message)
            }
            NetworkError::DnsFailure { host } => {
                write!(f, "DNS lookup failed for '{}'", host)
            }
            NetworkError::Timeout { operation, limit_secs } => {
                write!(f, "{} timed out after {}s", operation, limit_secs)
            }
            NetworkError::Tls { message } => {
                write!(f, "TLS failure: {}", message)
            }
            NetworkError::BodyDecode { message } => {
                write!(f, "response decode failed: {}", message)
            }
            NetworkError::Other { message } => {
                write!(f, "network error: {}", message)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

/// Map a reqwest error onto the taxonomy above.
///
/// `timeout_secs` is the client-configured limit, reported in the
/// Timeout variant since reqwest does not echo it back.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str, timeout_secs: u64) -> NetworkError {
    if err.is_timeout() {
        return NetworkError::Timeout {
            operation: "request".to_string(),
            limit_secs: timeout_secs,
        };
    }
    if err.is_connect() {
        return NetworkError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        };
    }
    if err.is_decode() {
        return NetworkError::BodyDecode {
            message: err.to_string(),
        };
    }

    // reqwest flattens TLS and DNS failures into its generic error text,
    // so sniff the message for the usual markers.
    let text = err.to_string().to_lowercase();
    if text.contains("tls") || text.contains("ssl") || text.contains("certificate") {
        NetworkError::Tls {
            message: err.to_string(),
        }
    } else if text.contains("dns") || text.contains("resolve") {
        NetworkError::DnsFailure { host: host_of(url) }
    } else {
        NetworkError::Other {
            message: err.to_string(),
        }
    }
}

/// Host portion of a URL string, best effort.
fn host_of(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    stripped
        .split(&['/', ':'][..])
        .next()
        .unwrap_or(url)
        .to_string()
}
