//! OpenAI-compatible Chat Completions wire types and configuration.

use serde::{Deserialize, Serialize};

use confab_core::turns::{ConversationTurn, Role};

/// Default base URL for the OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// SSE sentinel terminating a streamed completion.
pub const DONE_SENTINEL: &str = "[DONE]";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// OpenAI-compatible provider configuration.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Base URL (no trailing slash). Any OpenAI-compatible gateway works.
    pub base_url: String,
    /// Bearer API key.
    pub api_key: String,
}

impl OpenAiConfig {
    /// Config for the given key against the default OpenAI endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// One message in a Chat Completions request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role string (`system`, `user`, `assistant`, `tool`).
    pub role: String,
    /// Message text.
    pub content: String,
    /// Participant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool call this message responds to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        let role = match turn.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        Self {
            role: role.into(),
            content: turn.content.clone(),
            name: turn.name.clone(),
            tool_call_id: turn.tool_call_id.clone(),
        }
    }
}

/// Chat Completions request body.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    /// Model name.
    pub model: String,
    /// Ordered message list.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Max output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether to stream the response as SSE.
    pub stream: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// Non-streaming Chat Completions response (the fields we read).
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; we only ever use the first.
    pub choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChatResponseMessage,
}

/// Generated message body.
#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    /// Response text; absent for pure tool-call responses.
    pub content: Option<String>,
}

/// One SSE chunk of a streamed completion.
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    /// Delta choices; we only ever use the first.
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// One streamed choice delta.
#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    /// Incremental content.
    pub delta: StreamDelta,
}

/// Incremental message content.
#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    /// Text fragment; absent on role-announcement and final chunks.
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body shape returned by OpenAI-compatible endpoints.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// The error payload.
    pub error: ApiErrorDetail,
}

/// Error payload detail.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable message.
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_message_from_turn_maps_roles() {
        for (role, expected) in [
            (Role::System, "system"),
            (Role::User, "user"),
            (Role::Assistant, "assistant"),
            (Role::Tool, "tool"),
        ] {
            let turn = ConversationTurn::new(role, "x");
            assert_eq!(ChatMessage::from(&turn).role, expected);
        }
    }

    #[test]
    fn request_omits_absent_max_tokens() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![],
            temperature: 0.7,
            max_tokens: None,
            stream: true,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn response_parses_content() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        }))
        .unwrap();
        assert_eq!(
            resp.choices[0].message.content.as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn stream_chunk_parses_delta() {
        let chunk: StreamChunk = serde_json::from_value(json!({
            "choices": [{"delta": {"content": "Hi"}, "index": 0}]
        }))
        .unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hi"));
    }

    #[test]
    fn stream_chunk_tolerates_empty_delta() {
        let chunk: StreamChunk = serde_json::from_value(json!({
            "choices": [{"delta": {}, "finish_reason": "stop"}]
        }))
        .unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
    }

    #[test]
    fn error_body_parses() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "error": {"message": "Incorrect API key", "type": "invalid_request_error"}
        }))
        .unwrap();
        assert_eq!(body.error.message, "Incorrect API key");
    }
}
