//! Incremental SSE stream parsing.
//!
//! The Loom backend formats every event as `event: {type}\ndata: {json}\n\n`.
//! Transport chunking is arbitrary, so [`EventStreamParser`] buffers raw
//! bytes, carves off complete blocks at blank-line boundaries, and decodes
//! each block independently. Blocks that cannot be decoded are logged and
//! skipped without disturbing the rest of the stream.

mod content;
mod message;
mod misc;
mod tools;

use tracing::warn;

use crate::error::StreamError;
use crate::sse::events::{ParseEventError, StreamEvent};

use content::parse_content_chunk;
use message::{parse_assistant_message_complete, parse_assistant_message_start, parse_user_message};
use misc::{parse_error, parse_title_complete, parse_title_generation_started};
use tools::{parse_tool_call, parse_tool_result};

/// Upper bound on buffered bytes awaiting a block delimiter. A well-formed
/// stream never comes close; hitting it means the peer stopped sending
/// delimiters and the stream is unrecoverable.
const MAX_BUFFER_BYTES: usize = 10 * 1024 * 1024;

/// Longest block excerpt included in skip logs.
const PREVIEW_CHARS: usize = 120;

/// Parse a complete SSE event from its wire type and data payload.
///
/// The event type comes from the block's `event:` line and selects which
/// payload shape the data is decoded into.
pub fn parse_stream_event(event_type: &str, data: &str) -> Result<StreamEvent, ParseEventError> {
    match event_type {
        // Message lifecycle events
        "user_message" => parse_user_message(event_type, data),
        "assistant_message_start" => parse_assistant_message_start(event_type, data),
        "assistant_message_complete" => parse_assistant_message_complete(event_type, data),

        // Response content
        "content_chunk" => parse_content_chunk(event_type, data),

        // Tool passthrough events
        "tool_call" => parse_tool_call(event_type, data),
        "tool_result" => parse_tool_result(event_type, data),

        // Title generation
        "title_generation_started" => parse_title_generation_started(event_type, data),
        "title_complete" => parse_title_complete(event_type, data),

        // Backend-reported errors
        "error" => parse_error(event_type, data),

        unknown => Err(ParseEventError::UnknownEventType(unknown.to_string())),
    }
}

/// Scan one delimiter-free block and extract the event it carries, if any.
///
/// Returns `Ok(None)` for blocks with nothing to report, such as comment
/// keep-alives or stray blank lines. Lines matching neither `event:` nor
/// `data:` are ignored.
fn parse_block(block: &str) -> Result<Option<StreamEvent>, ParseEventError> {
    let mut event_type: Option<String> = None;
    let mut data_lines: Vec<String> = Vec::new();

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        if let Some(value) = line.strip_prefix("event:") {
            event_type = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.trim().to_string());
        }
    }

    match (event_type, data_lines.is_empty()) {
        (None, true) => Ok(None),
        (Some(event_type), true) => Err(ParseEventError::MissingData { event_type }),
        (None, false) => Err(ParseEventError::MissingEventType),
        (Some(event_type), false) => {
            parse_stream_event(&event_type, &data_lines.join("\n")).map(Some)
        }
    }
}

/// Find the earliest block delimiter in the buffer.
///
/// Both bare `\n\n` and CRLF `\r\n\r\n` delimiters occur in the wild,
/// sometimes within one stream, so whichever appears first wins. Returns
/// the delimiter's byte offset and length.
fn find_block_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let newline = find_subsequence(buffer, b"\n\n").map(|pos| (pos, 2));
    let carriage = find_subsequence(buffer, b"\r\n\r\n").map(|pos| (pos, 4));

    match (newline, carriage) {
        (Some(nl), Some(cr)) => Some(if cr.0 < nl.0 { cr } else { nl }),
        (Some(nl), None) => Some(nl),
        (None, Some(cr)) => Some(cr),
        (None, None) => None,
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn preview(block: &str) -> &str {
    match block.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &block[..idx],
        None => block,
    }
}

/// Incremental parser for a Loom SSE response body.
///
/// Feed it raw transport chunks as they arrive; it returns the events
/// completed by each chunk. Bytes after the last delimiter stay buffered
/// until a later chunk completes them, so chunk boundaries never affect
/// which events come out. Call [`EventStreamParser::finish`] at end of
/// stream to flush an event the peer never terminated with a delimiter.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning every event it completed in
    /// arrival order.
    ///
    /// Undecodable blocks are logged and dropped. The only fatal condition
    /// is the buffer growing past [`MAX_BUFFER_BYTES`] without a delimiter.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, StreamError> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();

        while let Some((pos, delimiter_len)) = find_block_boundary(&self.buffer) {
            // Delimiter bytes are ASCII, so this cut never lands inside a
            // multi-byte UTF-8 sequence and the lossy decode is exact for
            // valid input.
            let block = String::from_utf8_lossy(&self.buffer[..pos]).into_owned();
            self.buffer.drain(..pos + delimiter_len);

            match parse_block(&block) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping SSE block ({}): {:?}", e, preview(&block));
                }
            }
        }

        // Only bytes still awaiting a delimiter count against the cap, so
        // how the transport chunks a well-formed stream never matters.
        if self.buffer.len() > MAX_BUFFER_BYTES {
            return Err(StreamError::BufferExceeded {
                limit: MAX_BUFFER_BYTES,
            });
        }

        Ok(events)
    }

    /// Flush the final event once the stream has ended.
    ///
    /// Some backends omit the delimiter after the last event. Whatever
    /// remains buffered is parsed as one last block; anything incomplete
    /// or undecodable is logged and discarded.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if self.buffer.is_empty() {
            return None;
        }

        let block = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();

        match parse_block(&block) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping trailing SSE block ({}): {:?}", e, preview(&block));
                None
            }
        }
    }

    /// Number of bytes currently awaiting a delimiter.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::events::ContentChunkEvent;

    fn chunk_event(chunk: &str, content_length: u64) -> StreamEvent {
        StreamEvent::ContentChunk(ContentChunkEvent {
            chunk: chunk.to_string(),
            content_length,
        })
    }

    // parse_block

    #[test]
    fn test_parse_block_simple_event() {
        let block = "event: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}";
        let event = parse_block(block).unwrap();
        assert_eq!(event, Some(chunk_event("hi", 2)));
    }

    #[test]
    fn test_parse_block_no_space_after_colon() {
        let block = "event:content_chunk\ndata:{\"chunk\": \"hi\", \"content_length\": 2}";
        let event = parse_block(block).unwrap();
        assert_eq!(event, Some(chunk_event("hi", 2)));
    }

    #[test]
    fn test_parse_block_empty() {
        assert_eq!(parse_block("").unwrap(), None);
    }

    #[test]
    fn test_parse_block_comment_only() {
        assert_eq!(parse_block(": keep-alive").unwrap(), None);
    }

    #[test]
    fn test_parse_block_ignores_unrecognized_lines() {
        let block = "id: 7\nretry: 3000\nevent: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}";
        let event = parse_block(block).unwrap();
        assert_eq!(event, Some(chunk_event("hi", 2)));
    }

    #[test]
    fn test_parse_block_missing_data() {
        let result = parse_block("event: content_chunk");
        assert!(matches!(result, Err(ParseEventError::MissingData { .. })));
    }

    #[test]
    fn test_parse_block_data_without_event_type() {
        let result = parse_block("data: {\"chunk\": \"hi\", \"content_length\": 2}");
        assert!(matches!(result, Err(ParseEventError::MissingEventType)));
    }

    #[test]
    fn test_parse_block_joins_data_lines() {
        // Multiple data: lines concatenate with newlines per the SSE spec.
        // An unescaped newline inside a JSON string is invalid, which is
        // surfaced as an InvalidJson error rather than a panic.
        let block = "event: content_chunk\ndata: {\"chunk\": \"a\ndata: b\", \"content_length\": 3}";
        let result = parse_block(block);
        assert!(matches!(result, Err(ParseEventError::InvalidJson { .. })));
    }

    // parse_stream_event

    #[test]
    fn test_parse_unknown_event_type() {
        let result = parse_stream_event("heartbeat", "{}");
        assert!(matches!(result, Err(ParseEventError::UnknownEventType(t)) if t == "heartbeat"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_stream_event("content_chunk", "not json");
        assert!(matches!(result, Err(ParseEventError::InvalidJson { .. })));
    }

    // find_block_boundary

    #[test]
    fn test_find_block_boundary_newline() {
        assert_eq!(find_block_boundary(b"abc\n\ndef"), Some((3, 2)));
    }

    #[test]
    fn test_find_block_boundary_crlf() {
        assert_eq!(find_block_boundary(b"abc\r\n\r\ndef"), Some((3, 4)));
    }

    #[test]
    fn test_find_block_boundary_earliest_wins() {
        // Bare delimiter first
        assert_eq!(find_block_boundary(b"a\n\nb\r\n\r\nc"), Some((1, 2)));
        // CRLF delimiter first
        assert_eq!(find_block_boundary(b"a\r\n\r\nb\n\nc"), Some((1, 4)));
    }

    #[test]
    fn test_find_block_boundary_none() {
        assert_eq!(find_block_boundary(b"event: content_chunk\n"), None);
    }

    // EventStreamParser

    #[test]
    fn test_parser_single_event() {
        let mut parser = EventStreamParser::new();
        let events = parser
            .feed(b"event: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}\n\n")
            .unwrap();
        assert_eq!(events, vec![chunk_event("hi", 2)]);
        assert_eq!(parser.buffered_len(), 0);
    }

    #[test]
    fn test_parser_multiple_events_one_chunk() {
        let mut parser = EventStreamParser::new();
        let wire = "event: content_chunk\ndata: {\"chunk\": \"a\", \"content_length\": 1}\n\n\
                    event: content_chunk\ndata: {\"chunk\": \"b\", \"content_length\": 2}\n\n";
        let events = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(events, vec![chunk_event("a", 1), chunk_event("b", 2)]);
    }

    #[test]
    fn test_parser_event_split_across_chunks() {
        let mut parser = EventStreamParser::new();

        let events = parser.feed(b"event: content_ch").unwrap();
        assert!(events.is_empty());

        let events = parser.feed(b"unk\ndata: {\"chunk\": \"hi\", ").unwrap();
        assert!(events.is_empty());

        let events = parser.feed(b"\"content_length\": 2}\n\n").unwrap();
        assert_eq!(events, vec![chunk_event("hi", 2)]);
    }

    #[test]
    fn test_parser_delimiter_split_across_chunks() {
        let mut parser = EventStreamParser::new();

        let events = parser
            .feed(b"event: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}\n")
            .unwrap();
        assert!(events.is_empty());

        let events = parser.feed(b"\n").unwrap();
        assert_eq!(events, vec![chunk_event("hi", 2)]);
    }

    #[test]
    fn test_parser_chunk_split_inside_multibyte_char() {
        let mut parser = EventStreamParser::new();

        // "é" is 0xC3 0xA9; split the feed between the two bytes
        let wire = "event: content_chunk\ndata: {\"chunk\": \"é\", \"content_length\": 1}\n\n";
        let bytes = wire.as_bytes();
        let split = wire.find('é').unwrap() + 1;

        assert!(parser.feed(&bytes[..split]).unwrap().is_empty());
        let events = parser.feed(&bytes[split..]).unwrap();
        assert_eq!(events, vec![chunk_event("é", 1)]);
    }

    #[test]
    fn test_parser_crlf_stream() {
        let mut parser = EventStreamParser::new();
        let wire = "event: content_chunk\r\ndata: {\"chunk\": \"a\", \"content_length\": 1}\r\n\r\n\
                    event: content_chunk\r\ndata: {\"chunk\": \"b\", \"content_length\": 2}\r\n\r\n";
        let events = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(events, vec![chunk_event("a", 1), chunk_event("b", 2)]);
    }

    #[test]
    fn test_parser_mixed_delimiters() {
        let mut parser = EventStreamParser::new();
        let wire = "event: content_chunk\ndata: {\"chunk\": \"a\", \"content_length\": 1}\n\n\
                    event: content_chunk\r\ndata: {\"chunk\": \"b\", \"content_length\": 2}\r\n\r\n";
        let events = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(events, vec![chunk_event("a", 1), chunk_event("b", 2)]);
    }

    #[test]
    fn test_parser_empty_blocks_are_noops() {
        let mut parser = EventStreamParser::new();
        let wire = "\n\n: keep-alive\n\nevent: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}\n\n\n\n";
        let events = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(events, vec![chunk_event("hi", 2)]);
        assert_eq!(parser.buffered_len(), 0);
    }

    #[test]
    fn test_parser_malformed_json_dropped() {
        let mut parser = EventStreamParser::new();
        let wire = "event: content_chunk\ndata: {not json}\n\n\
                    event: content_chunk\ndata: {\"chunk\": \"ok\", \"content_length\": 2}\n\n";
        let events = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(events, vec![chunk_event("ok", 2)]);
    }

    #[test]
    fn test_parser_unknown_event_type_dropped() {
        let mut parser = EventStreamParser::new();
        let wire = "event: heartbeat\ndata: {}\n\n\
                    event: content_chunk\ndata: {\"chunk\": \"ok\", \"content_length\": 2}\n\n";
        let events = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(events, vec![chunk_event("ok", 2)]);
    }

    #[test]
    fn test_parser_finish_flushes_undelimited_event() {
        let mut parser = EventStreamParser::new();
        let events = parser
            .feed(b"event: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}")
            .unwrap();
        assert!(events.is_empty());

        assert_eq!(parser.finish(), Some(chunk_event("hi", 2)));
        assert_eq!(parser.buffered_len(), 0);
    }

    #[test]
    fn test_parser_finish_empty_buffer() {
        let mut parser = EventStreamParser::new();
        assert_eq!(parser.finish(), None);
    }

    #[test]
    fn test_parser_finish_discards_incomplete_event() {
        let mut parser = EventStreamParser::new();
        parser
            .feed(b"event: content_chunk\ndata: {\"chunk\": \"trunc")
            .unwrap();
        assert_eq!(parser.finish(), None);
    }

    #[test]
    fn test_parser_finish_discards_leftover_delimiter_fragment() {
        let mut parser = EventStreamParser::new();
        let events = parser
            .feed(b"event: content_chunk\ndata: {\"chunk\": \"hi\", \"content_length\": 2}\n\n\r")
            .unwrap();
        assert_eq!(events, vec![chunk_event("hi", 2)]);
        assert_eq!(parser.finish(), None);
    }

    #[test]
    fn test_parser_large_delimited_feed_stays_under_cap() {
        // Delimited events are drained before the cap is applied, so a
        // single feed larger than MAX_BUFFER_BYTES parses cleanly as long
        // as the bytes carry delimiters.
        let event = format!(
            "event: content_chunk\ndata: {{\"chunk\": \"{}\", \"content_length\": 4096}}\n\n",
            "x".repeat(4096)
        );
        let count = MAX_BUFFER_BYTES / event.len() + 2;
        let wire: String = event.repeat(count);
        assert!(wire.len() > MAX_BUFFER_BYTES);

        let mut parser = EventStreamParser::new();
        let single = parser.feed(wire.as_bytes()).unwrap();
        assert_eq!(single.len(), count);
        assert_eq!(parser.buffered_len(), 0);

        // And the same bytes in transport-sized pieces yield the same events
        let mut parser = EventStreamParser::new();
        let mut chunked = 0;
        for chunk in wire.as_bytes().chunks(4096) {
            chunked += parser.feed(chunk).unwrap().len();
        }
        assert_eq!(chunked, count);
    }

    #[test]
    fn test_parser_buffer_cap() {
        let mut parser = EventStreamParser::new();
        let chunk = vec![b'x'; 1024 * 1024];

        for _ in 0..10 {
            if parser.feed(&chunk).is_err() {
                return;
            }
        }

        let result = parser.feed(&chunk);
        assert!(matches!(result, Err(StreamError::BufferExceeded { .. })));
    }

    #[test]
    fn test_parser_byte_at_a_time() {
        let mut parser = EventStreamParser::new();
        let wire = "event: user_message\ndata: {\"id\": \"m-1\", \"conversation_id\": \"c-1\", \"role\": \"user\", \"content\": \"hé\", \"created_at\": \"2026-03-01T09:30:00+00:00\", \"model_used\": \"m\"}\n\n\
                    event: content_chunk\ndata: {\"chunk\": \"ok\", \"content_length\": 2}\n\n";

        let mut events = Vec::new();
        for byte in wire.as_bytes() {
            events.extend(parser.feed(std::slice::from_ref(byte)).unwrap());
        }
        if let Some(event) = parser.finish() {
            events.push(event);
        }

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], StreamEvent::UserMessage(_)));
        assert_eq!(events[1], chunk_event("ok", 2));
    }
}
