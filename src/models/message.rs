use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Persistence status of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Completed,
    Failed,
}

/// A saved message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message ID from the backend
    pub id: String,
    /// ID of the conversation this message belongs to
    pub conversation_id: String,
    /// Who wrote the message
    pub role: MessageRole,
    /// The message text
    pub content: String,
    /// Model that produced an assistant message; absent on user messages
    #[serde(default)]
    pub model_used: Option<String>,
    /// Whether the message was saved cleanly or after a failure
    pub status: MessageStatus,
    /// When the message was saved
    pub created_at: DateTime<Utc>,
}

/// One page of a conversation's message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePage {
    /// Messages in this page, oldest first
    pub messages: Vec<Message>,
    /// Total number of messages in the conversation
    pub total_count: u64,
    /// Whether more messages exist beyond this page
    pub has_more: bool,
    /// Timestamp cursor for fetching the next page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Query parameters for paging through message history.
///
/// The backend accepts a page size plus timestamp cursors in either
/// direction. Unset fields are left off the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageQuery {
    /// Page size, server default 20, server cap 100
    pub limit: Option<u32>,
    /// Only messages created before this timestamp
    pub before_timestamp: Option<String>,
    /// Only messages created after this timestamp
    pub after_timestamp: Option<String>,
}

impl MessageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size (builder pattern).
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page backwards from a timestamp cursor (builder pattern).
    pub fn before(mut self, timestamp: impl Into<String>) -> Self {
        self.before_timestamp = Some(timestamp.into());
        self
    }

    /// Page forwards from a timestamp cursor (builder pattern).
    pub fn after(mut self, timestamp: impl Into<String>) -> Self {
        self.after_timestamp = Some(timestamp.into());
        self
    }

    /// Render the query string pairs for a request URL.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(ts) = &self.before_timestamp {
            pairs.push(("before_timestamp", ts.clone()));
        }
        if let Some(ts) = &self.after_timestamp {
            pairs.push(("after_timestamp", ts.clone()));
        }
        pairs
    }
}
