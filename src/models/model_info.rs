use serde::{Deserialize, Serialize};

/// A model available for conversations.
///
/// The backend relays its model provider's catalog with minimal
/// reshaping, so pricing and provider details stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// Provider-scoped model ID, e.g. `anthropic/claude-sonnet-4`
    pub id: String,
    /// Human-readable model name
    pub name: String,
    /// Provider's description of the model
    #[serde(default)]
    pub description: String,
    /// Context window size in tokens
    #[serde(default)]
    pub context_length: Option<u64>,
    /// Provider pricing table, untyped
    #[serde(default)]
    pub pricing: serde_json::Value,
    /// Details of the provider currently serving the model, untyped
    #[serde(default)]
    pub top_provider: serde_json::Value,
}
