//! # confab-llm
//!
//! The completion client adapter: a [`provider::ChatProvider`] trait with
//! one-shot and streaming operations, and an OpenAI-compatible HTTP
//! implementation ([`openai::OpenAiProvider`]) using SSE for streaming.
//!
//! Provider-specific error shapes are isolated behind
//! [`provider::ProviderError`]; callers above the generation boundary
//! never see them.

#![deny(unsafe_code)]

pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::{ChatProvider, GenerationParams, ProviderError, TokenStream};
