use serde::{Deserialize, Serialize};

/// Request body for the streaming chat endpoint.
///
/// Optional fields are omitted from the JSON when unset so the backend
/// applies its own defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRequest {
    /// The message to send
    pub message_content: String,
    /// Model override for this exchange; defaults to the conversation's model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Reuse an already-saved user message instead of creating one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_user_message_id: Option<String>,
    /// Per-message tool toggle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tools: Option<bool>,
    /// Restrict which tools the assistant may use this exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_tools: Option<Vec<String>>,
    /// Enable or disable model reasoning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<bool>,
}

impl StreamRequest {
    /// Create a request carrying just the message content.
    pub fn new(message_content: impl Into<String>) -> Self {
        Self {
            message_content: message_content.into(),
            model: None,
            existing_user_message_id: None,
            use_tools: None,
            enabled_tools: None,
            reasoning: None,
        }
    }

    /// Override the model for this exchange (builder pattern).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Stream against an existing saved user message (builder pattern).
    pub fn with_existing_message(mut self, message_id: impl Into<String>) -> Self {
        self.existing_user_message_id = Some(message_id.into());
        self
    }

    /// Toggle tool use for this exchange (builder pattern).
    pub fn with_tools(mut self, use_tools: bool) -> Self {
        self.use_tools = Some(use_tools);
        self
    }

    /// Restrict the tool set for this exchange (builder pattern).
    pub fn with_enabled_tools(mut self, tools: Vec<String>) -> Self {
        self.enabled_tools = Some(tools);
        self
    }

    /// Toggle reasoning for this exchange (builder pattern).
    pub fn with_reasoning(mut self, reasoning: bool) -> Self {
        self.reasoning = Some(reasoning);
        self
    }
}
