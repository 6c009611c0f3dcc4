//! Provider stubs for tests and offline runs.
//!
//! These implement [`ChatProvider`] without touching the network:
//! [`ScriptedProvider`] replays fixed fragments, [`FailingProvider`]
//! always fails, [`TruncatingProvider`] fails mid-stream after a few
//! fragments.

use async_trait::async_trait;
use futures::stream;

use confab_core::turns::ConversationTurn;
use confab_llm::{ChatProvider, GenerationParams, ProviderError, TokenStream};

/// Provider replaying a fixed fragment script.
pub struct ScriptedProvider {
    fragments: Vec<String>,
}

impl ScriptedProvider {
    /// Create a provider that streams the given fragments and completes
    /// with their concatenation.
    #[must_use]
    pub fn new<S: Into<String>>(fragments: impl IntoIterator<Item = S>) -> Self {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(
        &self,
        _turns: &[ConversationTurn],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        Ok(self.fragments.concat())
    }

    async fn stream(
        &self,
        _turns: &[ConversationTurn],
        _params: &GenerationParams,
    ) -> Result<TokenStream, ProviderError> {
        let items: Vec<Result<String, ProviderError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

/// Provider whose every call fails before producing output.
pub struct FailingProvider;

#[async_trait]
impl ChatProvider for FailingProvider {
    async fn complete(
        &self,
        _turns: &[ConversationTurn],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            message: "stubbed failure".into(),
        })
    }

    async fn stream(
        &self,
        _turns: &[ConversationTurn],
        _params: &GenerationParams,
    ) -> Result<TokenStream, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            message: "stubbed failure".into(),
        })
    }
}

/// Provider that streams some fragments, then breaks mid-stream.
pub struct TruncatingProvider {
    fragments: Vec<String>,
}

impl TruncatingProvider {
    /// Create a provider that yields the given fragments and then an error.
    #[must_use]
    pub fn new<S: Into<String>>(fragments: impl IntoIterator<Item = S>) -> Self {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ChatProvider for TruncatingProvider {
    async fn complete(
        &self,
        _turns: &[ConversationTurn],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Stream("stubbed truncation".into()))
    }

    async fn stream(
        &self,
        _turns: &[ConversationTurn],
        _params: &GenerationParams,
    ) -> Result<TokenStream, ProviderError> {
        let mut items: Vec<Result<String, ProviderError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        items.push(Err(ProviderError::Stream("stubbed truncation".into())));
        Ok(Box::pin(stream::iter(items)))
    }
}
