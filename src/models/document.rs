use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A file attached to a message.
///
/// The backend extracts text (or base64 image data) at upload time for
/// the model's benefit but never returns that content through the API;
/// responses carry metadata only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Document ID
    pub id: String,
    /// Message the document is attached to
    pub message_id: String,
    /// Original filename, path components stripped by the server
    pub filename: String,
    /// File extension, lowercased, e.g. `pdf`
    pub file_type: String,
    /// File size in bytes; the server caps uploads at 10 MB
    pub file_size: u64,
    /// Whether the file is an image
    #[serde(default)]
    pub is_image: bool,
    /// When the document was uploaded
    pub created_at: DateTime<Utc>,
}

/// All documents attached to one message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentPage {
    /// The attachments, in upload order
    pub documents: Vec<Document>,
    /// Number of attachments on the message
    pub total_count: u64,
}

/// Pre-upload validation verdict for a file.
///
/// A rejection carries only `valid: false` and the reason; the metadata
/// fields are filled in on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileValidation {
    /// Whether the file would be accepted for upload
    pub valid: bool,
    /// Rejection reason, unset when valid
    #[serde(default)]
    pub error: Option<String>,
    /// Filename as the server saw it
    #[serde(default)]
    pub filename: Option<String>,
    /// Detected file extension
    #[serde(default)]
    pub file_type: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Server's estimate of text-extraction time, in seconds
    #[serde(default)]
    pub estimated_processing_time: Option<f64>,
}

/// Catalog of file types the backend accepts, grouped by category.
///
/// Categories (`documents`, `text_files`, `code_files`, `images`) map
/// extensions to descriptions; a `limits` entry carries upload bounds.
/// The grouping is presentational, so values stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportedFileTypes {
    #[serde(flatten)]
    pub categories: BTreeMap<String, serde_json::Value>,
}

impl SupportedFileTypes {
    /// Extensions listed under one category, sorted.
    pub fn extensions(&self, category: &str) -> Vec<String> {
        match self.categories.get(category) {
            Some(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}
