use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response from the backend health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Overall status, `healthy` when everything is up
    pub status: String,
    /// Server clock at check time, seconds since the epoch
    pub timestamp: f64,
    /// Database connectivity details
    pub database: DatabaseHealth,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response from the detailed health endpoint.
///
/// Each named check reports its own status plus check-specific fields
/// (response times, error messages), so the check bodies stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedHealth {
    /// Overall status; `unhealthy` if any check failed
    pub status: String,
    /// Server clock at check time, seconds since the epoch
    pub timestamp: f64,
    /// Per-subsystem check results, untyped
    #[serde(default)]
    pub checks: BTreeMap<String, serde_json::Value>,
}

impl DetailedHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Database portion of the health response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseHealth {
    /// `connected` when the probe query succeeded
    pub status: String,
    /// Round-trip time of the probe query in milliseconds
    pub response_time_ms: f64,
}
