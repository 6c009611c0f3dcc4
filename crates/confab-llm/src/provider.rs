//! Completion provider trait, parameters, and error taxonomy.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

use confab_core::turns::ConversationTurn;

/// Lazy sequence of generated text fragments.
///
/// Finite and not restartable. Each `Ok` item is a non-empty delta in
/// arrival order; an `Err` item truncates the sequence — the consumer
/// must treat whatever arrived before it as a partial result.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Generation parameters passed with every provider call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens; provider default when unset.
    pub max_tokens: Option<u32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

/// A language-model completion provider.
///
/// Implementations make exactly one outbound network call per operation
/// and have no other side effects.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// One-shot completion: the full response text in a single exchange.
    async fn complete(
        &self,
        turns: &[ConversationTurn],
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;

    /// Streaming completion: a lazy sequence of text fragments.
    ///
    /// An `Err` return means the stream never started (request or auth
    /// failure); mid-stream failures surface as an `Err` item inside the
    /// returned stream instead.
    async fn stream(
        &self,
        turns: &[ConversationTurn],
        params: &GenerationParams,
    ) -> Result<TokenStream, ProviderError>;
}

/// Provider failure taxonomy.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level HTTP failure.
    #[error("provider transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx API response.
    #[error("provider API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body (or the raw body).
        message: String,
    },

    /// 429 from the provider.
    #[error("provider rate limited: {message}")]
    RateLimited {
        /// Message extracted from the error body.
        message: String,
    },

    /// Credentials missing or rejected.
    #[error("provider auth error: {message}")]
    Auth {
        /// What went wrong.
        message: String,
    },

    /// A response or stream chunk failed to parse.
    #[error("provider response parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The SSE stream broke mid-flight.
    #[error("provider stream error: {0}")]
    Stream(String),

    /// The provider returned a well-formed response with no content.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.model, "gpt-4o-mini");
        assert!(params.max_tokens.is_none());
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = ProviderError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "provider API error (500): boom");
    }

    #[test]
    fn empty_response_display() {
        assert_eq!(
            ProviderError::EmptyResponse.to_string(),
            "provider returned an empty response"
        );
    }
}
