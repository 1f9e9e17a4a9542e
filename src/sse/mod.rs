//! SSE (Server-Sent Events) stream handling
//!
//! Consumes the Loom backend's streaming responses. The wire format is:
//! - `event: <type>` - event type line
//! - `data: <json>` - data payload line
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! Events are delivered through caller-registered handlers in arrival order,
//! regardless of how the transport chunks the bytes.
//!
//! # Module structure
//! - `events` - Event payload definitions (StreamEvent enum, ParseEventError)
//! - `parser` - Incremental wire parsing (EventStreamParser, parse_stream_event)
//! - `handlers` - Per-event callback registry (StreamHandlers)
//! - `reader` - Stream driver (StreamReader, StopHandle)

mod events;
mod handlers;
mod parser;
mod reader;

// Re-export public types
pub use events::{
    AssistantMessageCompleteEvent, AssistantMessageStartEvent, ContentChunkEvent, ErrorEvent,
    ParseEventError, StreamEvent, TitleCompleteEvent, TitleGenerationStartedEvent, ToolCallEvent,
    ToolResultEvent, UserMessageEvent,
};
pub use handlers::StreamHandlers;
pub use parser::{parse_stream_event, EventStreamParser};
pub use reader::{StopHandle, StreamReader};
