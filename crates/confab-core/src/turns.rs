//! Conversation turn types.
//!
//! - [`ConversationTurn`]: one canonical message in a conversation
//! - [`Role`]: closed role enum
//! - [`InboundTurn`]: the shapes a client may send for one turn

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Canonical turns
// ─────────────────────────────────────────────────────────────────────────────

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// Tool result.
    Tool,
}

/// One message in a conversation. Immutable once appended to a history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Role that produced this turn.
    pub role: Role,
    /// Text content.
    pub content: String,
    /// Optional participant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool call this turn responds to (role `tool` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ConversationTurn {
    /// Create a turn with the given role and content.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
        }
    }

    /// Create a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered, append-only sequence of turns for one conversation id.
pub type ConversationHistory = Vec<ConversationTurn>;

// ─────────────────────────────────────────────────────────────────────────────
// Inbound turn shapes
// ─────────────────────────────────────────────────────────────────────────────

/// One turn as supplied by a client, before normalization.
///
/// Clients send either well-formed `{role, content}` objects, bare strings,
/// or arbitrary JSON. Matching is exhaustive: anything that is not a
/// recognizable turn degrades to a user turn during normalization, so
/// parsing a turn list never fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundTurn {
    /// A well-formed turn object.
    Turn {
        /// Role tag.
        role: Role,
        /// Text content.
        content: String,
        /// Optional participant name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Tool call id (role `tool` only).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
    },
    /// A bare string.
    Text(String),
    /// Anything else.
    Opaque(Value),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
