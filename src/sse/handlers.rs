//! Handler registry for streaming chat events.
//!
//! Callers register one callback per event type they care about and hand the
//! registry to a stream reader. Events without a registered handler are
//! logged at debug level and dropped.

use tracing::debug;

use crate::error::StreamError;
use crate::sse::events::{
    AssistantMessageCompleteEvent, AssistantMessageStartEvent, ContentChunkEvent, ErrorEvent,
    StreamEvent, TitleCompleteEvent, TitleGenerationStartedEvent, ToolCallEvent, ToolResultEvent,
    UserMessageEvent,
};

/// Per-event callbacks for one streaming exchange.
///
/// Event handlers may fire many times and run synchronously on the reader
/// task, so they should hand work off rather than block. The two lifecycle
/// callbacks are terminal: exactly one of `on_close` or `on_connection_error`
/// fires, at most once, after the last event handler.
///
/// # Example
///
/// ```ignore
/// let handlers = StreamHandlers::new()
///     .on_content_chunk(|chunk| print!("{}", chunk.chunk))
///     .on_error(|err| eprintln!("backend error: {}", err.message))
///     .on_close(|| println!());
/// ```
#[derive(Default)]
pub struct StreamHandlers {
    on_user_message: Option<Box<dyn FnMut(UserMessageEvent) + Send>>,
    on_assistant_message_start: Option<Box<dyn FnMut(AssistantMessageStartEvent) + Send>>,
    on_content_chunk: Option<Box<dyn FnMut(ContentChunkEvent) + Send>>,
    on_tool_call: Option<Box<dyn FnMut(ToolCallEvent) + Send>>,
    on_tool_result: Option<Box<dyn FnMut(ToolResultEvent) + Send>>,
    on_assistant_message_complete: Option<Box<dyn FnMut(AssistantMessageCompleteEvent) + Send>>,
    on_title_generation_started: Option<Box<dyn FnMut(TitleGenerationStartedEvent) + Send>>,
    on_title_complete: Option<Box<dyn FnMut(TitleCompleteEvent) + Send>>,
    on_error: Option<Box<dyn FnMut(ErrorEvent) + Send>>,
    on_close: Option<Box<dyn FnOnce() + Send>>,
    on_connection_error: Option<Box<dyn FnOnce(StreamError) + Send>>,
}

impl StreamHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the backend confirms the user message was saved.
    pub fn on_user_message(mut self, f: impl FnMut(UserMessageEvent) + Send + 'static) -> Self {
        self.on_user_message = Some(Box::new(f));
        self
    }

    /// Called when the assistant's reply begins.
    pub fn on_assistant_message_start(
        mut self,
        f: impl FnMut(AssistantMessageStartEvent) + Send + 'static,
    ) -> Self {
        self.on_assistant_message_start = Some(Box::new(f));
        self
    }

    /// Called for each fragment of assistant response text.
    pub fn on_content_chunk(mut self, f: impl FnMut(ContentChunkEvent) + Send + 'static) -> Self {
        self.on_content_chunk = Some(Box::new(f));
        self
    }

    /// Called when the assistant invokes a tool.
    pub fn on_tool_call(mut self, f: impl FnMut(ToolCallEvent) + Send + 'static) -> Self {
        self.on_tool_call = Some(Box::new(f));
        self
    }

    /// Called when a tool invocation produces a result.
    pub fn on_tool_result(mut self, f: impl FnMut(ToolResultEvent) + Send + 'static) -> Self {
        self.on_tool_result = Some(Box::new(f));
        self
    }

    /// Called once the full assistant reply has been saved.
    pub fn on_assistant_message_complete(
        mut self,
        f: impl FnMut(AssistantMessageCompleteEvent) + Send + 'static,
    ) -> Self {
        self.on_assistant_message_complete = Some(Box::new(f));
        self
    }

    /// Called when the backend starts generating a conversation title.
    pub fn on_title_generation_started(
        mut self,
        f: impl FnMut(TitleGenerationStartedEvent) + Send + 'static,
    ) -> Self {
        self.on_title_generation_started = Some(Box::new(f));
        self
    }

    /// Called when a conversation title has been generated.
    pub fn on_title_complete(mut self, f: impl FnMut(TitleCompleteEvent) + Send + 'static) -> Self {
        self.on_title_complete = Some(Box::new(f));
        self
    }

    /// Called when the backend reports an error inside the stream.
    ///
    /// This is an ordinary event, not a transport failure. The stream stays
    /// open and `on_close` still fires when it ends.
    pub fn on_error(mut self, f: impl FnMut(ErrorEvent) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Called exactly once when the stream ends normally, after the final
    /// event has been dispatched.
    pub fn on_close(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Called exactly once if the transport fails mid-stream. Suppresses
    /// `on_close`.
    pub fn on_connection_error(mut self, f: impl FnOnce(StreamError) + Send + 'static) -> Self {
        self.on_connection_error = Some(Box::new(f));
        self
    }

    /// Route one event to its registered handler.
    pub(crate) fn dispatch(&mut self, event: StreamEvent) {
        let event_type = event.event_type_name();

        let handled = match event {
            StreamEvent::UserMessage(e) => run(&mut self.on_user_message, e),
            StreamEvent::AssistantMessageStart(e) => run(&mut self.on_assistant_message_start, e),
            StreamEvent::ContentChunk(e) => run(&mut self.on_content_chunk, e),
            StreamEvent::ToolCall(e) => run(&mut self.on_tool_call, e),
            StreamEvent::ToolResult(e) => run(&mut self.on_tool_result, e),
            StreamEvent::AssistantMessageComplete(e) => {
                run(&mut self.on_assistant_message_complete, e)
            }
            StreamEvent::TitleGenerationStarted(e) => {
                run(&mut self.on_title_generation_started, e)
            }
            StreamEvent::TitleComplete(e) => run(&mut self.on_title_complete, e),
            StreamEvent::Error(e) => run(&mut self.on_error, e),
        };

        if !handled {
            debug!("No handler registered for {} event", event_type);
        }
    }

    /// Fire the normal-termination callback. Safe to call more than once;
    /// only the first call reaches the handler.
    pub(crate) fn connection_closed(&mut self) {
        if let Some(handler) = self.on_close.take() {
            handler();
        }
    }

    /// Fire the transport-failure callback. Safe to call more than once;
    /// only the first call reaches the handler.
    pub(crate) fn connection_error(&mut self, error: StreamError) {
        if let Some(handler) = self.on_connection_error.take() {
            handler(error);
        }
    }
}

fn run<T>(slot: &mut Option<Box<dyn FnMut(T) + Send>>, payload: T) -> bool {
    match slot.as_mut() {
        Some(handler) => {
            handler(payload);
            true
        }
        None => false,
    }
}
