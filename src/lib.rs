//! weft - client core for the Loom conversation backend
//!
//! The crate centers on the `sse` module's stream event reader: byte
//! chunks in, typed events out, delivered through a caller-registered
//! handler set. Around it sit the typed REST client, configuration,
//! and the error taxonomy.

pub mod cli;
pub mod config;
pub mod error;
pub mod loom;
pub mod models;
pub mod sse;

pub use config::ClientConfig;
pub use error::{WeftError, WeftResult};
pub use loom::LoomClient;
