//! Content chunk event parser

use crate::sse::events::{ContentChunkEvent, ParseEventError, StreamEvent};

/// Parse an incremental chunk of assistant response text.
pub(super) fn parse_content_chunk(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: ContentChunkEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::ContentChunk(payload))
}
