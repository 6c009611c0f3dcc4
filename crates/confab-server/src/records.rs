//! Structured per-connection log records.
//!
//! One JSON record per loggable event:
//! `{"timestamp": <ISO-8601>, "uuid": <string|null>, <context>}` where
//! the context key is `received` (the parsed inbound payload) or `op`
//! (a lifecycle operation description). Records are emitted as the
//! message of a `tracing` event under the `confab::connection` target.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

/// Target for all connection records.
const TARGET: &str = "confab::connection";

/// One structured connection log record.
#[derive(Debug, Serialize)]
pub struct ConnectionRecord<'a> {
    /// ISO-8601 timestamp.
    pub timestamp: String,
    /// Conversation id, if established.
    pub uuid: Option<&'a str>,
    /// Context-specific payload.
    #[serde(flatten)]
    pub context: RecordContext<'a>,
}

/// The context-specific key of a record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordContext<'a> {
    /// A parsed inbound payload.
    Received(&'a Value),
    /// A lifecycle operation.
    Op(&'a str),
}

impl<'a> ConnectionRecord<'a> {
    /// Record for a received payload.
    #[must_use]
    pub fn received(uuid: Option<&'a str>, payload: &'a Value) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uuid,
            context: RecordContext::Received(payload),
        }
    }

    /// Record for a lifecycle operation.
    #[must_use]
    pub fn op(uuid: Option<&'a str>, op: &'a str) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uuid,
            context: RecordContext::Op(op),
        }
    }

    /// Serialize to a JSON line.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }
}

/// Log a received payload at info level.
pub fn log_received(uuid: Option<&str>, payload: &Value) {
    info!(target: TARGET, "{}", ConnectionRecord::received(uuid, payload).to_json());
}

/// Log a lifecycle operation at info level.
pub fn log_op(uuid: Option<&str>, op: &str) {
    info!(target: TARGET, "{}", ConnectionRecord::op(uuid, op).to_json());
}

/// Log a failed operation at error level.
pub fn log_op_error(uuid: Option<&str>, op: &str) {
    error!(target: TARGET, "{}", ConnectionRecord::op(uuid, op).to_json());
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
