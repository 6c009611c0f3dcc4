//! Service state and router construction.
//!
//! [`AppState`] is built explicitly at startup and passed by `Arc` to
//! every connection handler — no ambient globals for the provider
//! client or the session map.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use confab_llm::openai::OpenAiConfig;
use confab_llm::{ChatProvider, GenerationParams, OpenAiProvider};
use confab_settings::ConfabSettings;

use crate::pipeline::ChatPipeline;
use crate::registry::SessionRegistry;
use crate::websocket::connection::ws_handler;

/// Everything a connection handler needs, owned in one place.
pub struct AppState {
    /// Conversation id → history map.
    pub registry: SessionRegistry,
    /// The per-message processing pipeline.
    pub pipeline: ChatPipeline,
}

impl AppState {
    /// Build state around an already-constructed pipeline.
    #[must_use]
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self {
            registry: SessionRegistry::new(),
            pipeline,
        }
    }

    /// Build state from settings: OpenAI-compatible provider, generation
    /// parameters, system prompt, and pre-check triggers.
    #[must_use]
    pub fn from_settings(settings: &ConfabSettings) -> Self {
        let api_key = std::env::var(&settings.provider.api_key_env).unwrap_or_else(|_| {
            warn!(
                var = %settings.provider.api_key_env,
                "API key env var not set, provider calls will fail"
            );
            String::new()
        });
        let provider: Arc<dyn ChatProvider> = Arc::new(OpenAiProvider::new(OpenAiConfig {
            base_url: settings.provider.base_url.clone(),
            api_key,
        }));
        let params = GenerationParams {
            model: settings.provider.model.clone(),
            temperature: settings.provider.temperature,
            max_tokens: settings.provider.max_tokens,
        };
        let mut pipeline = ChatPipeline::new(provider, params)
            .with_easter_egg_triggers(settings.chat.easter_egg_triggers.clone());
        if let Some(prompt) = &settings.chat.system_prompt {
            pipeline = pipeline.with_system_prompt(prompt.clone());
        }
        Self::new(pipeline)
    }
}

/// Build the service router: `/ws` for the relay, `/health` for probes.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
