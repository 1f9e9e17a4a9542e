//! Stream reader driving handler callbacks from an SSE byte stream.
//!
//! A [`StreamReader`] is built fresh for each streaming request, consumes
//! the response body chunk by chunk, and invokes the registered handlers in
//! arrival order. It is consumed by [`StreamReader::run`], so state from one
//! stream can never leak into the next.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tracing::debug;

use crate::error::StreamError;
use crate::sse::handlers::StreamHandlers;
use crate::sse::parser::EventStreamParser;

/// Handle for ending a stream early from outside the reader task.
///
/// Stopping is fire-and-forget: the reader winds down without invoking any
/// further handlers, including the lifecycle callbacks. Calling
/// [`StopHandle::stop`] again, or after the stream has already ended, has no
/// effect.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Request that the reader stop consuming the stream.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Drives one SSE response body to completion.
pub struct StreamReader {
    parser: EventStreamParser,
    handlers: StreamHandlers,
    stop_rx: watch::Receiver<bool>,
}

impl StreamReader {
    /// Pair a reader with the stop handle that controls it.
    pub fn new(handlers: StreamHandlers) -> (Self, StopHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                parser: EventStreamParser::new(),
                handlers,
                stop_rx: rx,
            },
            StopHandle { tx },
        )
    }

    /// Consume the byte stream, dispatching events as they complete.
    ///
    /// Handlers run synchronously on this task. On normal end of stream any
    /// final undelimited event is flushed and then `on_close` fires; on
    /// transport failure `on_connection_error` fires instead. A caller stop
    /// ends the loop without either.
    pub async fn run<S>(mut self, mut stream: S)
    where
        S: Stream<Item = Result<Bytes, StreamError>> + Unpin,
    {
        // Disarmed when every stop handle is dropped, so the dropped-handle
        // wakeup cannot starve the stream branch.
        let mut stop_armed = true;

        loop {
            tokio::select! {
                changed = self.stop_rx.changed(), if stop_armed => {
                    if changed.is_ok() {
                        debug!("Stream reader stopped before end of stream");
                        return;
                    }
                    stop_armed = false;
                }
                next = stream.next() => match next {
                    Some(Ok(bytes)) => {
                        match self.parser.feed(&bytes) {
                            Ok(events) => {
                                for event in events {
                                    self.handlers.dispatch(event);
                                }
                            }
                            Err(e) => {
                                self.handlers.connection_error(e);
                                return;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        self.handlers.connection_error(e);
                        return;
                    }
                    None => {
                        if let Some(event) = self.parser.finish() {
                            self.handlers.dispatch(event);
                        }
                        debug!("SSE stream ended");
                        self.handlers.connection_closed();
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn ok(bytes: &'static [u8]) -> Result<Bytes, StreamError> {
        Ok(Bytes::from_static(bytes))
    }

    fn transport_error() -> StreamError {
        StreamError::Transport {
            source: NetworkError::ConnectionFailed {
                url: "http://localhost:8000".to_string(),
                message: "connection reset".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_run_dispatches_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_events = Arc::clone(&seen);
        let seen_close = Arc::clone(&seen);

        let handlers = StreamHandlers::new()
            .on_content_chunk(move |c| seen_events.lock().unwrap().push(c.chunk))
            .on_close(move || seen_close.lock().unwrap().push("<close>".to_string()));

        let (reader, _stop) = StreamReader::new(handlers);
        let body = stream::iter(vec![
            ok(b"event: content_chunk\ndata: {\"chunk\": \"a\", \"content_length\": 1}\n\n"),
            ok(b"event: content_chunk\ndata: {\"chunk\": \"b\", \"content_length\": 2}\n\n"),
        ]);

        reader.run(body).await;

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &["a".to_string(), "b".to_string(), "<close>".to_string()]
        );
    }

    #[tokio::test]
    async fn test_run_is_chunking_invariant() {
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_clone = Arc::clone(&seen);

        let handlers = StreamHandlers::new()
            .on_content_chunk(move |c| seen_clone.lock().unwrap().push_str(&c.chunk));

        let (reader, _stop) = StreamReader::new(handlers);
        // One event shattered across four transport chunks
        let body = stream::iter(vec![
            ok(b"event: conte"),
            ok(b"nt_chunk\nda"),
            ok(b"ta: {\"chunk\": \"hello\", \"content_le"),
            ok(b"ngth\": 5}\n\n"),
        ]);

        reader.run(body).await;

        assert_eq!(*seen.lock().unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_run_flushes_trailing_event_before_close() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let order_event = Arc::clone(&order);
        let order_close = Arc::clone(&order);

        let handlers = StreamHandlers::new()
            .on_assistant_message_complete(move |done| {
                order_event.lock().unwrap().push(format!("complete:{}", done.id));
            })
            .on_close(move || order_close.lock().unwrap().push("close".to_string()));

        let (reader, _stop) = StreamReader::new(handlers);
        // Final event arrives without its terminating blank line
        let body = stream::iter(vec![ok(
            b"event: assistant_message_complete\ndata: {\"id\": \"m-9\", \"content\": \"done\", \"status\": \"completed\", \"model_used\": \"m\", \"created_at\": \"2026-03-01T09:30:12+00:00\"}",
        )]);

        reader.run(body).await;

        assert_eq!(
            order.lock().unwrap().as_slice(),
            &["complete:m-9".to_string(), "close".to_string()]
        );
    }

    #[tokio::test]
    async fn test_run_transport_failure_fires_error_not_close() {
        let chunks = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let closes = Arc::new(AtomicUsize::new(0));
        let chunks_clone = Arc::clone(&chunks);
        let errors_clone = Arc::clone(&errors);
        let closes_clone = Arc::clone(&closes);

        let handlers = StreamHandlers::new()
            .on_content_chunk(move |_| {
                chunks_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_connection_error(move |e| {
                errors_clone.lock().unwrap().push(e.error_code());
            })
            .on_close(move || {
                closes_clone.fetch_add(1, Ordering::SeqCst);
            });

        let (reader, _stop) = StreamReader::new(handlers);
        let body = stream::iter(vec![
            ok(b"event: content_chunk\ndata: {\"chunk\": \"a\", \"content_length\": 1}\n\n"),
            Err(transport_error()),
        ]);

        reader.run(body).await;

        assert_eq!(chunks.load(Ordering::SeqCst), 1);
        assert_eq!(errors.lock().unwrap().as_slice(), &["E_STREAM_TRANSPORT"]);
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stop_ends_reader_without_callbacks() {
        let closes = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let closes_clone = Arc::clone(&closes);
        let errors_clone = Arc::clone(&errors);

        let handlers = StreamHandlers::new()
            .on_close(move || {
                closes_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_connection_error(move |_| {
                errors_clone.fetch_add(1, Ordering::SeqCst);
            });

        let (reader, stop) = StreamReader::new(handlers);
        let task = tokio::spawn(reader.run(stream::pending::<Result<Bytes, StreamError>>()));

        stop.stop();
        stop.stop();
        task.await.unwrap();

        assert_eq!(closes.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stop_after_completion_is_harmless() {
        let (reader, stop) = StreamReader::new(StreamHandlers::new());
        reader.run(stream::iter(Vec::new())).await;

        stop.stop();
        stop.stop();
    }

    #[tokio::test]
    async fn test_dropping_stop_handle_does_not_end_stream() {
        let seen = Arc::new(Mutex::new(String::new()));
        let closes = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        let closes_clone = Arc::clone(&closes);

        let handlers = StreamHandlers::new()
            .on_content_chunk(move |c| seen_clone.lock().unwrap().push_str(&c.chunk))
            .on_close(move || {
                closes_clone.fetch_add(1, Ordering::SeqCst);
            });

        let (reader, stop) = StreamReader::new(handlers);
        drop(stop);

        let body = stream::iter(vec![ok(
            b"event: content_chunk\ndata: {\"chunk\": \"still here\", \"content_length\": 10}\n\n",
        )]);
        reader.run(body).await;

        assert_eq!(*seen.lock().unwrap(), "still here");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_buffer_overflow_surfaces_as_connection_error() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_clone = Arc::clone(&errors);

        let handlers = StreamHandlers::new().on_connection_error(move |e| {
            errors_clone.lock().unwrap().push(e.error_code());
        });

        let (reader, _stop) = StreamReader::new(handlers);
        // 11 MiB with no delimiter anywhere
        let flood: Vec<Result<Bytes, StreamError>> = (0..11)
            .map(|_| Ok(Bytes::from(vec![b'x'; 1024 * 1024])))
            .collect();

        reader.run(stream::iter(flood)).await;

        assert_eq!(errors.lock().unwrap().as_slice(), &["E_STREAM_BUFFER"]);
    }
}
