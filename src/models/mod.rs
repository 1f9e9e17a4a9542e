//! Typed models for the Loom REST surface.
//!
//! Field names and shapes follow the backend JSON exactly; everything
//! deserializes with serde and keeps ids as opaque strings.

mod conversation;
mod document;
mod health;
mod message;
mod model_info;
mod profile;
mod request;
mod tools;

pub use conversation::{Conversation, ConversationListItem, ConversationPatch, NewConversation};
pub use document::{Document, DocumentPage, FileValidation, SupportedFileTypes};
pub use health::{DatabaseHealth, DetailedHealth, HealthStatus};
pub use message::{Message, MessagePage, MessageQuery, MessageRole, MessageStatus};
pub use model_info::ModelInfo;
pub use profile::{Profile, ProfilePatch};
pub use request::StreamRequest;
pub use tools::ToolCatalog;
