use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    /// Conversation ID
    pub id: String,
    /// Owner's user ID
    pub user_id: String,
    /// Title, unset until the backend generates one
    #[serde(default)]
    pub title: Option<String>,
    /// Model new messages in this conversation will use
    pub current_model: String,
    /// Custom system prompt, if one has been set
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
    /// When the conversation was last modified
    pub updated_at: DateTime<Utc>,
}

/// Sidebar-style conversation summary from the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationListItem {
    /// Conversation ID
    pub id: String,
    /// Title, unset until the backend generates one
    #[serde(default)]
    pub title: Option<String>,
    /// Model new messages in this conversation will use
    pub current_model: String,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
    /// When the conversation was last modified
    pub updated_at: DateTime<Utc>,
    /// Number of messages in the conversation
    #[serde(default)]
    pub message_count: u64,
    /// Truncated text of the latest message
    #[serde(default)]
    pub last_message_preview: Option<String>,
    /// When the latest message was sent
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Request body for creating a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewConversation {
    /// Initial title; usually left unset for the backend to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Model the conversation starts with
    pub current_model: String,
    /// Custom system prompt for the conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl NewConversation {
    /// Create a request with the given model and no title or prompt.
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            title: None,
            current_model: model.into(),
            system_prompt: None,
        }
    }

    /// Set the initial title (builder pattern).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the system prompt (builder pattern).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Partial update for a conversation. Unset fields are left unchanged
/// by the backend and omitted from the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl ConversationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new title (builder pattern).
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a new model (builder pattern).
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.current_model = Some(model.into());
        self
    }

    /// Set a new system prompt (builder pattern).
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}
