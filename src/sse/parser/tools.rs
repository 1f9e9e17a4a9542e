//! Tool event parsers
//!
//! Tool payloads are forwarded by the backend without reshaping, so these
//! parsers only lift out the tool name and keep the rest untyped.

use crate::sse::events::{ParseEventError, StreamEvent, ToolCallEvent, ToolResultEvent};

/// Parse a tool invocation announcement.
pub(super) fn parse_tool_call(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: ToolCallEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::ToolCall(payload))
}

/// Parse a tool invocation result.
pub(super) fn parse_tool_result(
    event_type: &str,
    data: &str,
) -> Result<StreamEvent, ParseEventError> {
    let payload: ToolResultEvent =
        serde_json::from_str(data).map_err(|e| ParseEventError::InvalidJson {
            event_type: event_type.to_string(),
            source: e.to_string(),
        })?;
    Ok(StreamEvent::ToolResult(payload))
}

#[cfg(test)]
mod tests {
    use crate::sse::events::StreamEvent;
    use crate::sse::parser::parse_stream_event;

    #[test]
    fn test_parse_tool_call_event() {
        let data = r#"{"tool_name": "supabase_list_tables", "arguments": {"schemas": ["public"]}}"#;
        let event = parse_stream_event("tool_call", data).unwrap();
        match event {
            StreamEvent::ToolCall(call) => {
                assert_eq!(call.tool_name, Some("supabase_list_tables".to_string()));
                assert_eq!(call.details["arguments"]["schemas"][0], "public");
            }
            _ => panic!("Expected ToolCall event"),
        }
    }

    #[test]
    fn test_parse_tool_call_empty_payload() {
        // The backend falls back to an empty object when the tool layer
        // provided no data
        let event = parse_stream_event("tool_call", "{}").unwrap();
        match event {
            StreamEvent::ToolCall(call) => assert_eq!(call.tool_name, None),
            _ => panic!("Expected ToolCall event"),
        }
    }

    #[test]
    fn test_parse_tool_result_event() {
        let data = r#"{"tool_name": "supabase_execute_sql", "success": true, "result": "3 rows"}"#;
        let event = parse_stream_event("tool_result", data).unwrap();
        match event {
            StreamEvent::ToolResult(result) => {
                assert_eq!(result.tool_name, Some("supabase_execute_sql".to_string()));
                assert_eq!(result.details["result"], "3 rows");
            }
            _ => panic!("Expected ToolResult event"),
        }
    }

    #[test]
    fn test_parse_tool_result_structured_payload() {
        // Result payloads are tool-specific and may nest arbitrarily
        let data = r#"{"rows": [{"id": 1}, {"id": 2}], "truncated": false}"#;
        let event = parse_stream_event("tool_result", data).unwrap();
        match event {
            StreamEvent::ToolResult(result) => {
                assert_eq!(result.tool_name, None);
                assert_eq!(result.details["rows"][1]["id"], 2);
                assert_eq!(result.details["truncated"], false);
            }
            _ => panic!("Expected ToolResult event"),
        }
    }
}
