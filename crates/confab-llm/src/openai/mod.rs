//! OpenAI-compatible provider implementing [`ChatProvider`].
//!
//! Talks to any Chat Completions endpoint (OpenAI itself or a
//! compatible gateway) with Bearer auth. Streaming uses SSE: each
//! `data:` payload carries a content delta, `data: [DONE]` terminates.

pub mod types;

use async_stream::stream;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use tracing::{debug, error, instrument};

use confab_core::turns::ConversationTurn;

use crate::provider::{ChatProvider, GenerationParams, ProviderError, TokenStream};
pub use types::OpenAiConfig;
use types::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, DONE_SENTINEL, StreamChunk};

/// OpenAI-compatible LLM provider.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new provider.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new provider with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: OpenAiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Build the request body.
    fn build_request(
        turns: &[ConversationTurn],
        params: &GenerationParams,
        streaming: bool,
    ) -> ChatRequest {
        ChatRequest {
            model: params.model.clone(),
            messages: turns.iter().map(ChatMessage::from).collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: streaming,
        }
    }

    /// POST the request and fail on non-2xx status.
    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(
            model = %request.model,
            message_count = request.messages.len(),
            stream = request.stream,
            "sending chat completion request"
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(status.as_u16(), response).await);
        }
        Ok(response)
    }

    /// Map a non-2xx response to the provider error taxonomy.
    async fn error_from_response(status: u16, response: reqwest::Response) -> ProviderError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map_or_else(|_| body.clone(), |parsed| parsed.error.message);
        error!(status, message = %message, "chat completion API error");
        match status {
            401 | 403 => ProviderError::Auth { message },
            429 => ProviderError::RateLimited { message },
            _ => ProviderError::Api { status, message },
        }
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiProvider {
    #[instrument(skip_all, fields(model = %params.model))]
    async fn complete(
        &self,
        turns: &[ConversationTurn],
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = Self::build_request(turns, params, false);
        let response = self.send(&request).await?;
        let parsed: ChatResponse = response.json().await.map_err(ProviderError::Http)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    #[instrument(skip_all, fields(model = %params.model))]
    async fn stream(
        &self,
        turns: &[ConversationTurn],
        params: &GenerationParams,
    ) -> Result<TokenStream, ProviderError> {
        let request = Self::build_request(turns, params, true);
        let response = self.send(&request).await?;

        let mut events = response.bytes_stream().eventsource();
        let tokens = stream! {
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if event.data == DONE_SENTINEL {
                            break;
                        }
                        match serde_json::from_str::<StreamChunk>(&event.data) {
                            Ok(chunk) => {
                                let delta = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|choice| choice.delta.content);
                                if let Some(delta) = delta
                                    && !delta.is_empty()
                                {
                                    yield Ok(delta);
                                }
                            }
                            Err(e) => {
                                yield Err(ProviderError::Json(e));
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(ProviderError::Stream(e.to_string()));
                        break;
                    }
                }
            }
        };
        Ok(Box::pin(tokens))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
