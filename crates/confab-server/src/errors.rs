//! Relay error taxonomy.
//!
//! Each variant has a fixed recovery policy:
//!
//! - [`RelayError::FrameParse`] — recovered in the frame loop: the frame
//!   is dropped and logged, the connection stays open.
//! - [`RelayError::Sink`] — the transport went away mid-generation; ends
//!   the current run and the frame loop.
//! - [`RelayError::Close`] — closing an already-closed transport; logged,
//!   never re-raised.
//!
//! Provider failures never appear here: they are absorbed into
//! substitute output at the generation boundary.

use thiserror::Error;

use confab_core::errors::SinkError;

/// Connection-level relay failure.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed inbound JSON frame.
    #[error("JSON encoding error - {0}")]
    FrameParse(#[from] serde_json::Error),

    /// Outbound event delivery failed.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Transport close failed (peer already closed).
    #[error("WebSocket close error: {0}")]
    Close(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_parse_display_matches_log_wording() {
        let err = RelayError::FrameParse(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(err.to_string().starts_with("JSON encoding error - "));
    }

    #[test]
    fn sink_error_is_transparent() {
        let err = RelayError::from(SinkError::Closed);
        assert_eq!(err.to_string(), "event sink closed");
    }

    #[test]
    fn close_display() {
        let err = RelayError::Close("already closed".into());
        assert_eq!(err.to_string(), "WebSocket close error: already closed");
    }
}
