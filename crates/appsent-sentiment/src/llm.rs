//! Chat-model collaborator and its Ollama HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response parse error: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("invalid model server URL '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Always `false`: one complete response per call.
    pub stream: bool,
}

/// A chat reply. Both levels are optional so a malformed reply still
/// deserializes and the caller decides what an unexpected shape means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Convenience constructor for a well-formed assistant reply.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            message: Some(ResponseMessage {
                role: Some("assistant".to_string()),
                content: Some(content.into()),
            }),
        }
    }

    /// The textual message body, if the reply has one.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.message.as_ref()?.content.as_deref()
    }
}

/// Sends one chat exchange to a language model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure or a non-2xx reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Client for Ollama's `/api/chat` endpoint.
///
/// No request timeout is set here; callers bound each call themselves.
pub struct OllamaClient {
    client: Client,
    chat_url: Url,
}

impl OllamaClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LlmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let chat_url = Url::parse(&normalised)
            .and_then(|u| u.join("api/chat"))
            .map_err(|_| LlmError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self { client, chat_url })
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::trace!(body = %body, "raw model response");
        serde_json::from_str(&body).map_err(LlmError::Deserialize)
    }
}
