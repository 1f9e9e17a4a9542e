//! Title and error event parsers

use crate::sse::events::{
    ErrorEvent, ParseEventError, StreamEvent, TitleCompleteEvent, TitleGenerationStartedEvent,
};

/// Parse the announcement that title generation has begun.
pub(super) fn parse_title_generation_started(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: TitleGenerationStartedEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::TitleGenerationStarted(payload))
}

/// Parse a generated conversation title.
pub(super) fn parse_title_complete(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: TitleCompleteEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::TitleComplete(payload))
}

/// Parse an error reported by the backend mid-stream.
pub(super) fn parse_error(event_type: &str, data: &str) -> Result<StreamEvent, ParseEventError> {
    let payload: ErrorEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::Error(payload))
}
