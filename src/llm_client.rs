//! HTTP transport to the model's OpenAI-compatible chat endpoint.

use async_trait::async_trait;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::agent_config::AgentConfig;

/// Transport-layer failure talking to the model endpoint.
///
/// Timeouts stay distinct from other transport failures so callers can
/// apply different policies (a slow local model versus a dead one).
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LlmError {
    /// The request exceeded the configured deadline.
    #[display("model request timed out after {_0}s")]
    Timeout(u64),
    /// Connection failure, non-success status, or a malformed response
    /// envelope.
    #[display("model transport failed: {_0}")]
    Transport(String),
}

impl std::error::Error for LlmError {}

/// The seam between the move pipeline and the model endpoint.
///
/// Production uses [`LlmClient`]; tests inject scripted implementations.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends one system + user message pair, returning the assistant's
    /// raw text reply.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        (**self).complete(system_prompt, user_message).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for Ollama's OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    model: String,
    endpoint: String,
    timeout_seconds: u64,
}

impl LlmClient {
    /// Creates a client from the agent configuration.
    ///
    /// The configured timeout applies to each request end to end.
    #[instrument(skip(config), fields(model = %config.model(), base_url = %config.base_url()))]
    pub fn new(config: &AgentConfig) -> Result<Self, LlmError> {
        let timeout_seconds = *config.timeout_seconds();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| {
                error!(error = %e, "failed to build HTTP client");
                LlmError::Transport(format!("failed to build HTTP client: {e}"))
            })?;
        let endpoint = format!(
            "{}/v1/chat/completions",
            config.base_url().trim_end_matches('/')
        );
        info!(%endpoint, "created model client");
        Ok(Self {
            http,
            model: config.model().clone(),
            endpoint,
            timeout_seconds,
        })
    }

    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            error!(
                timeout_seconds = self.timeout_seconds,
                "model request timed out"
            );
            LlmError::Timeout(self.timeout_seconds)
        } else {
            error!(error = %err, "model request failed");
            LlmError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ChatTransport for LlmClient {
    #[instrument(skip(self, system_prompt, user_message), fields(model = %self.model))]
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        debug!(endpoint = %self.endpoint, "sending chat completion request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            error!(status = %status, body = %body, "model endpoint returned an error");
            return Err(LlmError::Transport(format!(
                "model endpoint error {status}: {body}"
            )));
        }

        debug!(body_len = body.len(), "parsing chat completion envelope");
        let envelope: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "failed to parse chat completion envelope");
            LlmError::Transport(format!("failed to parse response envelope: {e}"))
        })?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                error!("no choices in model response");
                LlmError::Transport("no choices returned from model endpoint".to_string())
            })?
            .message
            .content
            .ok_or_else(|| {
                error!("no message content in model response");
                LlmError::Transport("no message content in model response".to_string())
            })?;

        info!(content_len = content.len(), "received model completion");
        Ok(content)
    }
}
