//! Settings schema and compiled defaults.

use serde::{Deserialize, Serialize};

/// Default system prompt injected when a conversation has none.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer concisely and accurately.";

/// Top-level settings document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfabSettings {
    /// Listen address and port.
    pub server: ServerSettings,
    /// Completion provider endpoint and generation parameters.
    pub provider: ProviderSettings,
    /// Conversation behavior.
    pub chat: ChatSettings,
}

impl Default for ConfabSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            provider: ProviderSettings::default(),
            chat: ChatSettings::default(),
        }
    }
}

/// WebSocket server settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

/// Completion provider settings.
///
/// The API key itself never lives in the settings file; `api_key_env`
/// names the environment variable it is read from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// Base URL of an OpenAI-compatible API (no trailing slash).
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens; provider default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

/// Conversation behavior settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    /// System prompt injected (idempotently) per generation call.
    /// `None` disables injection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Case-sensitive substrings that fire the pre-check notification.
    pub easter_egg_triggers: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.into()),
            easter_egg_triggers: vec!["easter egg".into(), "konami".into()],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
