//! Conversation pipeline: the per-message two-stage flow.
//!
//! One run = one user message cycle: `Idle → PreCheck → Generating → Done`.
//! The pre-check scans the newest turn for trigger substrings and may
//! emit a side-channel notification; generation invokes the completion
//! provider and streams fragments through the sink. The pipeline holds
//! no history of its own — it receives one and returns an augmented
//! copy, appending exactly one assistant turn per run.
//!
//! Provider failures never escape: the apology text substitutes for the
//! whole output, and the terminating end event is always emitted. Only
//! sink delivery failures (the connection went away) propagate.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, warn};

use confab_core::errors::SinkError;
use confab_core::events::StreamEvent;
use confab_core::normalize::ensure_system_prompt;
use confab_core::turns::{ConversationHistory, ConversationTurn};
use confab_llm::{ChatProvider, GenerationParams};

use crate::sink::EventSink;

/// Substitute output when the provider fails before producing anything.
pub const APOLOGY_TEXT: &str =
    "Sorry — I ran into a problem generating a response. Please try again.";

/// The per-message processing pipeline. Stateless across runs.
pub struct ChatPipeline {
    provider: Arc<dyn ChatProvider>,
    params: GenerationParams,
    system_prompt: Option<String>,
    easter_egg_triggers: Vec<String>,
}

impl ChatPipeline {
    /// Create a pipeline over the given provider, with no system prompt
    /// and no pre-check triggers.
    #[must_use]
    pub fn new(provider: Arc<dyn ChatProvider>, params: GenerationParams) -> Self {
        Self {
            provider,
            params,
            system_prompt: None,
            easter_egg_triggers: Vec::new(),
        }
    }

    /// Inject this system prompt (idempotently) at each generation call.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Case-sensitive substrings that fire the pre-check notification.
    #[must_use]
    pub fn with_easter_egg_triggers(mut self, triggers: Vec<String>) -> Self {
        self.easter_egg_triggers = triggers;
        self
    }

    /// Run one message cycle and return the augmented history.
    ///
    /// With a sink attached the provider is consumed in streaming mode
    /// (token events in arrival order, then exactly one end event); with
    /// no sink a single one-shot completion is made and nothing is
    /// emitted. Always returns a history ending in one assistant turn —
    /// degraded to the apology text under provider failure.
    pub async fn run(
        &self,
        history: &[ConversationTurn],
        new_turns: Vec<ConversationTurn>,
        sink: Option<&dyn EventSink>,
    ) -> Result<ConversationHistory, SinkError> {
        // Pre-check: inspect only the newest turn. Non-blocking — the
        // run continues regardless of the outcome.
        if let Some(sink) = sink
            && self.precheck_triggered(new_turns.last())
        {
            sink.emit(StreamEvent::easter_egg())?;
        }

        let mut turns: ConversationHistory = history.to_vec();
        turns.extend(new_turns);
        if let Some(prompt) = &self.system_prompt {
            ensure_system_prompt(&mut turns, prompt);
        }

        let text = match sink {
            Some(sink) => self.generate_streaming(&turns, sink).await?,
            None => self.generate_oneshot(&turns).await,
        };

        turns.push(ConversationTurn::assistant(text));
        Ok(turns)
    }

    fn precheck_triggered(&self, newest: Option<&ConversationTurn>) -> bool {
        newest.is_some_and(|turn| {
            self.easter_egg_triggers
                .iter()
                .any(|trigger| turn.content.contains(trigger.as_str()))
        })
    }

    /// Consume the provider stream, forwarding fragments through the sink.
    ///
    /// Truncation keeps the fragments already delivered; a stream that
    /// produced nothing at all degrades to the apology text. Exactly one
    /// end event is emitted on every path.
    async fn generate_streaming(
        &self,
        turns: &[ConversationTurn],
        sink: &dyn EventSink,
    ) -> Result<String, SinkError> {
        let mut full = String::new();
        match self.provider.stream(turns, &self.params).await {
            Ok(mut tokens) => {
                while let Some(item) = tokens.next().await {
                    match item {
                        Ok(fragment) => {
                            sink.emit(StreamEvent::token(fragment.clone()))?;
                            full.push_str(&fragment);
                        }
                        Err(e) => {
                            warn!(error = %e, "provider stream truncated, keeping partial output");
                            break;
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "provider stream failed to start"),
        }

        if full.is_empty() {
            full = APOLOGY_TEXT.to_owned();
            sink.emit(StreamEvent::token(full.clone()))?;
        }
        sink.emit(StreamEvent::end())?;
        debug!(chars = full.len(), "generation finished");
        Ok(full)
    }

    async fn generate_oneshot(&self, turns: &[ConversationTurn]) -> String {
        match self.provider.complete(turns, &self.params).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "one-shot completion failed");
                APOLOGY_TEXT.to_owned()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
