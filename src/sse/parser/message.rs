//! Message lifecycle event parsers

use crate::sse::events::{
    AssistantMessageCompleteEvent, AssistantMessageStartEvent, ParseEventError, StreamEvent,
    UserMessageEvent,
};

/// Parse the confirmation that the user's message was saved.
pub(super) fn parse_user_message(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: UserMessageEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::UserMessage(payload))
}

/// Parse the marker that opens the assistant's reply.
pub(super) fn parse_assistant_message_start(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: AssistantMessageStartEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::AssistantMessageStart(payload))
}

/// Parse the finalized assistant message sent after the last chunk.
pub(super) fn parse_assistant_message_complete(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: AssistantMessageCompleteEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::AssistantMessageComplete(payload))
}
