//! Event-sink delivery errors.
//!
//! A [`SinkError`] means the consumer of stream events went away (the
//! connection closed mid-generation) or an event could not be encoded.
//! It is the only error a pipeline run propagates: provider failures are
//! absorbed into substitute output before they reach the sink.

use thiserror::Error;

/// Failure to deliver a stream event to its consumer.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving side is gone; the current run cannot continue.
    #[error("event sink closed")]
    Closed,

    /// The event could not be serialized to a wire frame.
    #[error("event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
