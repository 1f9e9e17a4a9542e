//! HTTP client for the Loom backend.
//!
//! [`LoomClient`] owns request construction, auth headers, and
//! status-code handling for the REST surface, and exposes the two
//! streaming endpoints as byte streams ready for a
//! [`StreamReader`](crate::sse::StreamReader). It is constructed
//! explicitly from a validated [`ClientConfig`]; there is no global
//! instance.

use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{
    classify_reqwest_error, ApiError, NetworkError, StreamError, WeftError, WeftResult,
};
use crate::models::{
    Conversation, ConversationListItem, ConversationPatch, DetailedHealth, Document, DocumentPage,
    FileValidation, HealthStatus, Message, MessagePage, MessageQuery, ModelInfo, NewConversation,
    Profile, ProfilePatch, StreamRequest, SupportedFileTypes, ToolCatalog,
};
use crate::sse::{StreamHandlers, StreamReader};

/// Byte-chunk stream from a streaming endpoint, errors classified.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

/// Request body for `PATCH /{id}/model`.
#[derive(Serialize)]
struct ModelUpdate<'a> {
    model: &'a str,
}

/// Request body for `PATCH /{id}/system-prompt`.
#[derive(Serialize)]
struct SystemPromptUpdate<'a> {
    system_prompt: &'a str,
}

/// Request body for `POST /{id}/branch`.
#[derive(Serialize)]
struct BranchRequest<'a> {
    message_id: &'a str,
}

/// Request body for non-streaming message creation.
#[derive(Serialize)]
struct MessageCreate<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Request body for `POST /{mid}/edit`.
#[derive(Serialize)]
struct MessageEditRequest<'a> {
    new_content: &'a str,
}

/// Request body for `POST /{mid}/retry`.
#[derive(Serialize)]
struct MessageRetryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Request body for `PUT /{mid}/documents/{did}`.
#[derive(Serialize)]
struct DocumentRename<'a> {
    filename: &'a str,
}

/// Edit and retry respond with the new branch wrapped in an envelope.
#[derive(Deserialize)]
struct BranchEnvelope {
    new_conversation: Conversation,
}

/// The image endpoint wraps its base64 data URL in an envelope.
#[derive(Deserialize)]
struct ImageEnvelope {
    data_url: String,
}

/// `GET /tools/clients` wraps the client names in an envelope.
#[derive(Deserialize)]
struct ClientsEnvelope {
    clients: Vec<String>,
}

/// Client for the Loom backend API.
///
/// Cheap to clone would be nice but unnecessary; construct one and pass
/// it by reference. All authenticated requests carry
/// `Authorization: Bearer <token>`.
pub struct LoomClient {
    base_url: String,
    config: ClientConfig,
    http: Client,
}

impl LoomClient {
    /// Build a client from validated configuration.
    ///
    /// Fails fast with a [`ConfigError`](crate::error::ConfigError) if
    /// the base URL or token is unusable; nothing is checked lazily on
    /// first request.
    pub fn new(config: ClientConfig) -> WeftResult<Self> {
        config.validate().map_err(WeftError::Config)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!("Loom client for {}", base_url);

        Ok(Self {
            base_url,
            config,
            http: Client::new(),
        })
    }

    /// Server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Send a REST request: auth header, timeout, status check.
    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> WeftResult<reqwest::Response> {
        let response = builder
            .bearer_auth(&self.config.access_token)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .send()
            .await
            .map_err(|e| {
                WeftError::Network(classify_reqwest_error(
                    &e,
                    url,
                    self.config.request_timeout_secs,
                ))
            })?;

        Self::check_status(response).await.map_err(WeftError::Api)
    }

    /// Turn a non-success response into an [`ApiError`] carrying the
    /// body text, which is where the backend puts its `detail` field.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        debug!("Request failed with HTTP {}: {}", status, detail);
        Err(ApiError::new(status.as_u16(), detail))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> WeftResult<T> {
        response.json().await.map_err(|e| {
            WeftError::Network(NetworkError::BodyDecode {
                message: e.to_string(),
            })
        })
    }

    // --- Health ---

    /// `GET /health` — backend and database liveness. Unauthenticated,
    /// served at the server root rather than under the API prefix.
    pub async fn health(&self) -> WeftResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `GET /health/detailed` — per-subsystem health checks.
    pub async fn detailed_health(&self) -> WeftResult<DetailedHealth> {
        let url = format!("{}/health/detailed", self.base_url);
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    // --- Conversations ---

    /// `GET /conversations/` — the user's conversations, most recent
    /// first.
    pub async fn list_conversations(
        &self,
        limit: u32,
        offset: u32,
    ) -> WeftResult<Vec<ConversationListItem>> {
        let url = self.api_url("/conversations/");
        let builder = self
            .http
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)]);
        let response = self.execute(builder, &url).await?;
        Self::decode(response).await
    }

    /// `POST /conversations/` — create a conversation.
    pub async fn create_conversation(&self, request: &NewConversation) -> WeftResult<Conversation> {
        let url = self.api_url("/conversations/");
        let response = self.execute(self.http.post(&url).json(request), &url).await?;
        Self::decode(response).await
    }

    /// `GET /conversations/{id}`.
    pub async fn get_conversation(&self, conversation_id: &str) -> WeftResult<Conversation> {
        let url = self.api_url(&format!("/conversations/{}", conversation_id));
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `PATCH /conversations/{id}` — partial update.
    pub async fn update_conversation(
        &self,
        conversation_id: &str,
        patch: &ConversationPatch,
    ) -> WeftResult<Conversation> {
        let url = self.api_url(&format!("/conversations/{}", conversation_id));
        let response = self.execute(self.http.patch(&url).json(patch), &url).await?;
        Self::decode(response).await
    }

    /// `PATCH /conversations/{id}/model` — switch the active model.
    pub async fn update_conversation_model(
        &self,
        conversation_id: &str,
        model: &str,
    ) -> WeftResult<Conversation> {
        let url = self.api_url(&format!("/conversations/{}/model", conversation_id));
        let body = ModelUpdate { model };
        let response = self.execute(self.http.patch(&url).json(&body), &url).await?;
        Self::decode(response).await
    }

    /// `PATCH /conversations/{id}/system-prompt`.
    pub async fn update_system_prompt(
        &self,
        conversation_id: &str,
        prompt: &str,
    ) -> WeftResult<Conversation> {
        let url = self.api_url(&format!("/conversations/{}/system-prompt", conversation_id));
        let body = SystemPromptUpdate {
            system_prompt: prompt,
        };
        let response = self.execute(self.http.patch(&url).json(&body), &url).await?;
        Self::decode(response).await
    }

    /// `DELETE /conversations/{id}/system-prompt` — revert to the
    /// default prompt.
    pub async fn clear_system_prompt(&self, conversation_id: &str) -> WeftResult<Conversation> {
        let url = self.api_url(&format!("/conversations/{}/system-prompt", conversation_id));
        let response = self.execute(self.http.delete(&url), &url).await?;
        Self::decode(response).await
    }

    /// `DELETE /conversations/{id}` — expects 204.
    pub async fn delete_conversation(&self, conversation_id: &str) -> WeftResult<()> {
        let url = self.api_url(&format!("/conversations/{}", conversation_id));
        self.execute(self.http.delete(&url), &url).await?;
        Ok(())
    }

    /// `POST /conversations/{id}/branch` — fork the conversation from a
    /// specific message.
    pub async fn branch_conversation(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> WeftResult<Conversation> {
        let url = self.api_url(&format!("/conversations/{}/branch", conversation_id));
        let body = BranchRequest { message_id };
        let response = self.execute(self.http.post(&url).json(&body), &url).await?;
        Self::decode(response).await
    }

    // --- Messages ---

    /// `GET /conversations/{id}/messages` — one page of history.
    pub async fn list_messages(
        &self,
        conversation_id: &str,
        query: &MessageQuery,
    ) -> WeftResult<MessagePage> {
        let url = self.api_url(&format!("/conversations/{}/messages", conversation_id));
        let builder = self.http.get(&url).query(&query.to_query_pairs());
        let response = self.execute(builder, &url).await?;
        Self::decode(response).await
    }

    /// `GET /conversations/{id}/messages/{mid}`.
    pub async fn get_message(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> WeftResult<Message> {
        let url = self.api_url(&format!(
            "/conversations/{}/messages/{}",
            conversation_id, message_id
        ));
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `POST /conversations/{id}/messages` — save a message without
    /// streaming a reply.
    pub async fn create_message(
        &self,
        conversation_id: &str,
        content: &str,
        model: Option<&str>,
    ) -> WeftResult<Message> {
        let url = self.api_url(&format!("/conversations/{}/messages", conversation_id));
        let body = MessageCreate { content, model };
        let response = self.execute(self.http.post(&url).json(&body), &url).await?;
        Self::decode(response).await
    }

    /// `POST /conversations/{id}/messages/{mid}/edit` — edit a user
    /// message. The backend branches the conversation rather than
    /// rewriting history and returns the new branch.
    pub async fn edit_message(
        &self,
        conversation_id: &str,
        message_id: &str,
        new_content: &str,
    ) -> WeftResult<Conversation> {
        let url = self.api_url(&format!(
            "/conversations/{}/messages/{}/edit",
            conversation_id, message_id
        ));
        let body = MessageEditRequest { new_content };
        let response = self.execute(self.http.post(&url).json(&body), &url).await?;
        let envelope: BranchEnvelope = Self::decode(response).await?;
        Ok(envelope.new_conversation)
    }

    /// `POST /conversations/{id}/messages/{mid}/retry` — regenerate an
    /// assistant reply, optionally on a different model. Branches like
    /// [`edit_message`](Self::edit_message).
    pub async fn retry_message(
        &self,
        conversation_id: &str,
        message_id: &str,
        model: Option<&str>,
    ) -> WeftResult<Conversation> {
        let url = self.api_url(&format!(
            "/conversations/{}/messages/{}/retry",
            conversation_id, message_id
        ));
        let body = MessageRetryRequest { model };
        let response = self.execute(self.http.post(&url).json(&body), &url).await?;
        let envelope: BranchEnvelope = Self::decode(response).await?;
        Ok(envelope.new_conversation)
    }

    // --- Documents ---

    /// `POST /messages/{mid}/documents` — attach a file to a message.
    ///
    /// The file travels as a multipart upload; the server extracts text
    /// (or image data) for the model and returns metadata only. Uploads
    /// over 10 MB or of an unsupported type come back as a 400.
    pub async fn upload_document(
        &self,
        message_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> WeftResult<Document> {
        let url = self.api_url(&format!("/messages/{}/documents", message_id));
        let form = Self::file_form(filename, bytes);
        let response = self.execute(self.http.post(&url).multipart(form), &url).await?;
        Self::decode(response).await
    }

    /// `GET /messages/{mid}/documents` — all attachments on a message.
    pub async fn list_documents(&self, message_id: &str) -> WeftResult<DocumentPage> {
        let url = self.api_url(&format!("/messages/{}/documents", message_id));
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `GET /messages/{mid}/documents/{did}`.
    pub async fn get_document(
        &self,
        message_id: &str,
        document_id: &str,
    ) -> WeftResult<Document> {
        let url = self.api_url(&format!(
            "/messages/{}/documents/{}",
            message_id, document_id
        ));
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `GET /messages/{mid}/documents/{did}/image` — an image attachment
    /// as a `data:image/...;base64,` URL ready for display.
    pub async fn document_image(
        &self,
        message_id: &str,
        document_id: &str,
    ) -> WeftResult<String> {
        let url = self.api_url(&format!(
            "/messages/{}/documents/{}/image",
            message_id, document_id
        ));
        let response = self.execute(self.http.get(&url), &url).await?;
        let envelope: ImageEnvelope = Self::decode(response).await?;
        Ok(envelope.data_url)
    }

    /// `PUT /messages/{mid}/documents/{did}` — rename an attachment. The
    /// filename is the only mutable field.
    pub async fn rename_document(
        &self,
        message_id: &str,
        document_id: &str,
        filename: &str,
    ) -> WeftResult<Document> {
        let url = self.api_url(&format!(
            "/messages/{}/documents/{}",
            message_id, document_id
        ));
        let body = DocumentRename { filename };
        let response = self.execute(self.http.put(&url).json(&body), &url).await?;
        Self::decode(response).await
    }

    /// `DELETE /messages/{mid}/documents/{did}`.
    pub async fn delete_document(&self, message_id: &str, document_id: &str) -> WeftResult<()> {
        let url = self.api_url(&format!(
            "/messages/{}/documents/{}",
            message_id, document_id
        ));
        self.execute(self.http.delete(&url), &url).await?;
        Ok(())
    }

    /// `GET /messages/supported-types` — accepted file types and upload
    /// limits.
    pub async fn supported_file_types(&self) -> WeftResult<SupportedFileTypes> {
        let url = self.api_url("/messages/supported-types");
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `POST /messages/validate` — check a file against the upload rules
    /// without attaching it anywhere.
    pub async fn validate_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> WeftResult<FileValidation> {
        let url = self.api_url("/messages/validate");
        let form = Self::file_form(filename, bytes);
        let response = self.execute(self.http.post(&url).multipart(form), &url).await?;
        Self::decode(response).await
    }

    fn file_form(filename: &str, bytes: Vec<u8>) -> Form {
        Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()))
    }

    // --- Models, tools, profile ---

    /// `GET /models/` — models available for conversations.
    pub async fn list_models(&self) -> WeftResult<Vec<ModelInfo>> {
        let url = self.api_url("/models/");
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `GET /tools/available` — tool clients and their definitions.
    pub async fn available_tools(&self) -> WeftResult<ToolCatalog> {
        let url = self.api_url("/tools/available");
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `GET /tools/clients` — just the configured tool client names.
    pub async fn tool_clients(&self) -> WeftResult<Vec<String>> {
        let url = self.api_url("/tools/clients");
        let response = self.execute(self.http.get(&url), &url).await?;
        let envelope: ClientsEnvelope = Self::decode(response).await?;
        Ok(envelope.clients)
    }

    /// `GET /user/profile`.
    pub async fn profile(&self) -> WeftResult<Profile> {
        let url = self.api_url("/user/profile");
        let response = self.execute(self.http.get(&url), &url).await?;
        Self::decode(response).await
    }

    /// `PATCH /user/profile` — partial update.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> WeftResult<Profile> {
        let url = self.api_url("/user/profile");
        let response = self.execute(self.http.patch(&url).json(patch), &url).await?;
        Self::decode(response).await
    }

    // --- Streaming ---

    /// `POST /conversations/{id}/messages/stream` — send a message and
    /// stream the assistant's reply.
    ///
    /// Returns the raw byte stream with transport errors already
    /// classified, ready to hand to a
    /// [`StreamReader`](crate::sse::StreamReader). A non-success status
    /// is read to completion and surfaced as
    /// [`StreamError::Rejected`]. No timeout is applied; the stream
    /// stays open as long as the model generates.
    pub async fn stream_message(
        &self,
        conversation_id: &str,
        request: &StreamRequest,
    ) -> Result<ByteStream, StreamError> {
        let url = self.api_url(&format!(
            "/conversations/{}/messages/stream",
            conversation_id
        ));
        self.open_stream(self.http.post(&url).json(request), url).await
    }

    /// `POST /conversations/{id}/generate-title` — stream title
    /// generation for a conversation's first exchange.
    pub async fn stream_title(&self, conversation_id: &str) -> Result<ByteStream, StreamError> {
        let url = self.api_url(&format!("/conversations/{}/generate-title", conversation_id));
        self.open_stream(self.http.post(&url), url).await
    }

    async fn open_stream(
        &self,
        builder: reqwest::RequestBuilder,
        url: String,
    ) -> Result<ByteStream, StreamError> {
        let timeout_secs = self.config.request_timeout_secs;
        let response = builder
            .bearer_auth(&self.config.access_token)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| StreamError::Transport {
                source: classify_reqwest_error(&e, &url, timeout_secs),
            })?;

        let response = Self::check_status(response).await?;

        let stream = response.bytes_stream().map(move |item| {
            item.map_err(|e| StreamError::Transport {
                source: classify_reqwest_error(&e, &url, timeout_secs),
            })
        });
        Ok(Box::pin(stream))
    }

    /// Run one streaming chat exchange through a handler set.
    ///
    /// Opens the stream and drives a fresh [`StreamReader`] over it to
    /// completion. A failure to open the stream lands in the handler
    /// set's connection-error callback, so callers using handlers never
    /// see an `Err` path at all.
    pub async fn chat(
        &self,
        conversation_id: &str,
        request: &StreamRequest,
        handlers: StreamHandlers,
    ) {
        match self.stream_message(conversation_id, request).await {
            Ok(stream) => {
                let (reader, _stop) = StreamReader::new(handlers);
                reader.run(stream).await;
            }
            Err(err) => {
                let mut handlers = handlers;
                handlers.connection_error(err);
            }
        }
    }
}
