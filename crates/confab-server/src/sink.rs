//! Event sink capability: where a pipeline run's stream events go.
//!
//! Two concrete sinks: [`ChannelSink`] forwards serialized frames into a
//! connection's outbound channel; [`BufferSink`] accumulates events in
//! memory for tests and one-shot callers.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use confab_core::errors::SinkError;
use confab_core::events::StreamEvent;

/// Consumer of a pipeline run's stream events.
///
/// `emit` must not block: delivery failure means the consumer is gone
/// and the current run should stop.
pub trait EventSink: Send + Sync {
    /// Deliver one event. `Err` ends the current pipeline run.
    fn emit(&self, event: StreamEvent) -> Result<(), SinkError>;
}

/// Sink that serializes events into a connection's outbound frame channel.
///
/// The channel is drained by the connection's writer task, which owns the
/// only send path to the socket. If the writer is gone (peer disconnected
/// mid-generation) `emit` fails and the run unwinds.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Bind a sink to an outbound frame channel.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: StreamEvent) -> Result<(), SinkError> {
        let frame = serde_json::to_string(&event)?;
        self.tx.send(frame).map_err(|_| SinkError::Closed)
    }
}

/// Sink that accumulates events in memory.
#[derive(Default)]
pub struct BufferSink {
    events: Mutex<Vec<StreamEvent>>,
}

impl BufferSink {
    /// Create an empty buffer sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for BufferSink {
    fn emit(&self, event: StreamEvent) -> Result<(), SinkError> {
        self.events.lock().push(event);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn channel_sink_serializes_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);

        sink.emit(StreamEvent::token("Hi")).unwrap();
        sink.emit(StreamEvent::end()).unwrap();

        assert_eq!(rx.try_recv().unwrap(), r#"{"on_chat_model_stream":"Hi"}"#);
        assert_eq!(rx.try_recv().unwrap(), r#"{"on_chat_model_end":true}"#);
    }

    #[test]
    fn channel_sink_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(rx);
        let sink = ChannelSink::new(tx);
        assert_matches!(sink.emit(StreamEvent::end()), Err(SinkError::Closed));
    }

    #[test]
    fn buffer_sink_accumulates_in_order() {
        let sink = BufferSink::new();
        sink.emit(StreamEvent::easter_egg()).unwrap();
        sink.emit(StreamEvent::token("a")).unwrap();
        sink.emit(StreamEvent::end()).unwrap();
        assert_eq!(
            sink.events(),
            vec![
                StreamEvent::easter_egg(),
                StreamEvent::token("a"),
                StreamEvent::end(),
            ]
        );
    }
}
