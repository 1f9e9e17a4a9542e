//! Error handling for the weft client.
//!
//! One module per failure domain, plus a unified type:
//!
//! - [`NetworkError`] — connection, DNS, TLS, timeout, body decode
//! - [`ApiError`] — non-success HTTP responses
//! - [`StreamError`] — terminal event-stream conditions
//! - [`ConfigError`] — construction-time configuration problems
//! - [`WeftError`] / [`WeftResult`] — the unified surface
//!
//! Every domain exposes `error_code()` for log lines and
//! `user_message()` for display; retryable variants answer
//! `is_retryable()`. Per-event decode problems inside a stream are not
//! represented here at all: the parser logs and drops those without
//! ending the stream.

mod api;
mod config;
mod network;
mod stream;
mod weft_error;

pub use api::ApiError;
pub use config::ConfigError;
pub use network::{classify_reqwest_error, NetworkError};
pub use stream::StreamError;
pub use weft_error::{WeftError, WeftResult};
