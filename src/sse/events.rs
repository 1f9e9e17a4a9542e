//! SSE event types for Loom streaming responses.
//!
//! This module defines all the event types that can be received from the Loom
//! backend via Server-Sent Events (SSE) during a streaming chat exchange,
//! along with the wrapper enum handed to stream handlers.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{MessageRole, MessageStatus};

/// Confirmation that the user's message has been persisted.
///
/// Sent as the first event of a chat stream, after the backend has saved
/// the message the stream request carried (or resolved an existing one).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UserMessageEvent {
    /// ID assigned to the saved user message
    pub id: String,
    /// Conversation the message belongs to
    pub conversation_id: String,
    /// Always `user` for this event
    pub role: MessageRole,
    /// The message text as saved
    pub content: String,
    /// When the message was saved
    pub created_at: DateTime<Utc>,
    /// Model selected for the exchange this message opens
    pub model_used: String,
}

/// Event marking the beginning of the assistant's reply.
///
/// Sent once per stream, before any content chunks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AssistantMessageStartEvent {
    /// Conversation the reply belongs to
    pub conversation_id: String,
    /// Always `assistant` for this event
    pub role: MessageRole,
    /// Model generating the reply
    pub model_used: String,
    /// Persistence status the reply will be saved with
    pub status: MessageStatus,
}

/// Incremental chunk of assistant response text.
///
/// Received repeatedly while the assistant generates its reply.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContentChunkEvent {
    /// The text fragment to append
    pub chunk: String,
    /// Running total length of the response so far, in characters
    pub content_length: u64,
}

/// Tool invocation announced by the assistant.
///
/// The backend forwards the payload from its tool layer verbatim, so the
/// fields beyond `tool_name` vary by tool.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolCallEvent {
    /// Name of the tool being invoked, when the backend includes it
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Remaining tool-specific fields, untyped
    #[serde(flatten)]
    pub details: serde_json::Value,
}

/// Result of a tool invocation.
///
/// Forwarded verbatim like [`ToolCallEvent`]; the shape depends on the tool.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolResultEvent {
    /// Name of the tool that produced the result, when included
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Remaining tool-specific fields, untyped
    #[serde(flatten)]
    pub details: serde_json::Value,
}

/// Event carrying the finalized assistant message.
///
/// Sent after the last content chunk, once the full reply has been saved.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AssistantMessageCompleteEvent {
    /// ID assigned to the saved assistant message
    pub id: String,
    /// The complete response text
    pub content: String,
    /// Persistence status of the saved message
    pub status: MessageStatus,
    /// Model that generated the reply
    pub model_used: String,
    /// When the message was saved
    pub created_at: DateTime<Utc>,
}

/// Event announcing that conversation title generation has started.
///
/// Sent after the first assistant reply in an untitled conversation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TitleGenerationStartedEvent {
    /// Conversation a title is being generated for
    pub conversation_id: String,
}

/// Event carrying a freshly generated conversation title.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TitleCompleteEvent {
    /// The generated title
    pub title: String,
    /// Conversation the title belongs to. Omitted when the title was
    /// requested through the dedicated title endpoint, which already
    /// identifies the conversation.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Event indicating an error occurred during streaming.
///
/// May be sent at any point. The stream usually ends shortly after.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorEvent {
    /// Human-readable error message
    pub message: String,
}

/// Wrapper enum for all event types the Loom backend streams.
///
/// The event type travels on the `event:` line of each SSE block, so
/// variants are constructed by the stream parser rather than deserialized
/// directly. Use pattern matching to handle events during stream processing.
///
/// # Example
///
/// ```ignore
/// match event {
///     StreamEvent::ContentChunk(chunk) => {
///         // Append chunk.chunk to the visible reply
///     }
///     StreamEvent::AssistantMessageComplete(done) => {
///         // Replace the accumulated text with done.content
///     }
///     StreamEvent::Error(err) => {
///         // Surface err.message
///     }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// User message persisted
    UserMessage(UserMessageEvent),
    /// Assistant reply starting
    AssistantMessageStart(AssistantMessageStartEvent),
    /// Assistant response text chunk
    ContentChunk(ContentChunkEvent),
    /// Tool invocation started
    ToolCall(ToolCallEvent),
    /// Tool invocation result
    ToolResult(ToolResultEvent),
    /// Assistant reply finalized
    AssistantMessageComplete(AssistantMessageCompleteEvent),
    /// Title generation started
    TitleGenerationStarted(TitleGenerationStartedEvent),
    /// Title generated
    TitleComplete(TitleCompleteEvent),
    /// Error reported by the backend
    Error(ErrorEvent),
}

impl StreamEvent {
    /// Returns the wire name of the event type, as it appears on the
    /// `event:` line.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::UserMessage(_) => "user_message",
            StreamEvent::AssistantMessageStart(_) => "assistant_message_start",
            StreamEvent::ContentChunk(_) => "content_chunk",
            StreamEvent::ToolCall(_) => "tool_call",
            StreamEvent::ToolResult(_) => "tool_result",
            StreamEvent::AssistantMessageComplete(_) => "assistant_message_complete",
            StreamEvent::TitleGenerationStarted(_) => "title_generation_started",
            StreamEvent::TitleComplete(_) => "title_complete",
            StreamEvent::Error(_) => "error",
        }
    }
}

/// Errors that can occur while decoding a single SSE block.
///
/// These never abort the stream. The parser logs the offending block and
/// moves on to the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEventError {
    /// Event type not in the Loom vocabulary
    UnknownEventType(String),
    /// Invalid JSON in the data payload
    InvalidJson {
        event_type: String,
        source: String,
    },
    /// Block declared an event type but carried no data
    MissingData {
        event_type: String,
    },
    /// Block carried data but never declared an event type
    MissingEventType,
}

impl std::fmt::Display for ParseEventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseEventError::UnknownEventType(t) => write!(f, "Unknown SSE event type: {}", t),
            ParseEventError::InvalidJson { event_type, source } => {
                write!(f, "Invalid JSON for event '{}': {}", event_type, source)
            }
            ParseEventError::MissingData { event_type } => {
                write!(f, "Missing data for event type: {}", event_type)
            }
            ParseEventError::MissingEventType => {
                write!(f, "Data received without an event type")
            }
        }
    }
}

impl std::error::Error for ParseEventError {}
