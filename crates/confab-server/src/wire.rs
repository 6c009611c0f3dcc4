//! Inbound wire protocol: one JSON object per text frame.
//!
//! `{"uuid"?: string, "init"?: bool, "message"?: string | [turn, ...]}`
//!
//! Unknown keys are ignored. A frame with no `message` (or an empty one)
//! is a heartbeat.

use serde::Deserialize;

use confab_core::normalize::normalize;
use confab_core::turns::{ConversationTurn, InboundTurn};

/// Parsed inbound frame envelope.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InboundFrame {
    /// Conversation id to adopt for this connection.
    pub uuid: Option<String>,
    /// Client initialization ping.
    pub init: Option<bool>,
    /// Chat content, if any.
    pub message: Option<MessagePayload>,
}

impl InboundFrame {
    /// Whether this frame is an initialization ping.
    #[must_use]
    pub fn is_init(&self) -> bool {
        self.init.unwrap_or(false)
    }
}

/// The `message` field: either a bare string or a turn list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum MessagePayload {
    /// A single user utterance.
    Text(String),
    /// One or more turn-like objects.
    Turns(Vec<InboundTurn>),
}

impl MessagePayload {
    /// Whether there is nothing to process (heartbeat).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Turns(turns) => turns.is_empty(),
        }
    }

    /// Convert into canonical turns for the pipeline.
    #[must_use]
    pub fn into_turns(self) -> Vec<ConversationTurn> {
        match self {
            Self::Text(text) => vec![ConversationTurn::user(text)],
            Self::Turns(turns) => normalize(turns),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
