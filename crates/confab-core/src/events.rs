//! Outbound stream events.
//!
//! Each event is serialized as a single-key JSON object, one per text
//! frame. The wire keys are load-bearing: the frontend matches on them
//! exactly.
//!
//! Per user message the order is strict: at most one `on_easter_egg`,
//! then zero or more `on_chat_model_stream`, then exactly one
//! `on_chat_model_end` — always, even when generation fails.

use serde::{Deserialize, Serialize};

/// One outbound event during a generation cycle.
///
/// Serialized forms:
///
/// | Variant | Wire frame |
/// |---------|------------|
/// | `ChatStreamToken` | `{"on_chat_model_stream": "<text>"}` |
/// | `ChatStreamEnd` | `{"on_chat_model_end": true}` |
/// | `EasterEgg` | `{"on_easter_egg": true}` |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    /// One generated text fragment, in arrival order.
    ChatStreamToken {
        /// Fragment text.
        #[serde(rename = "on_chat_model_stream")]
        token: String,
    },
    /// Generation finished (success or truncation). Always the last event.
    ChatStreamEnd {
        /// Always `true` on the wire.
        #[serde(rename = "on_chat_model_end")]
        done: bool,
    },
    /// Pre-check trigger fired. Sent before any stream tokens.
    EasterEgg {
        /// Whether the trigger matched.
        #[serde(rename = "on_easter_egg")]
        triggered: bool,
    },
}

impl StreamEvent {
    /// A token fragment event.
    #[must_use]
    pub fn token(text: impl Into<String>) -> Self {
        Self::ChatStreamToken { token: text.into() }
    }

    /// The terminating end-of-generation event.
    #[must_use]
    pub fn end() -> Self {
        Self::ChatStreamEnd { done: true }
    }

    /// The easter-egg notification event.
    #[must_use]
    pub fn easter_egg() -> Self {
        Self::EasterEgg { triggered: true }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
