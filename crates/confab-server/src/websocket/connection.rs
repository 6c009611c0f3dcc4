//! Per-connection frame loop and dispatch.
//!
//! Lifecycle: `Connecting → Open → Closing → Closed`. Malformed frames
//! are dropped without closing the connection; only transport failures
//! (receive errors, or outbound delivery failure mid-generation) end
//! the loop. The close path always runs, and a close failure on an
//! already-closed peer is logged, never re-raised.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use metrics::counter;
use serde_json::Value;
use tokio::sync::mpsc;

use confab_core::text::preview;

use crate::app::AppState;
use crate::errors::RelayError;
use crate::records;
use crate::sink::ChannelSink;
use crate::wire::InboundFrame;

/// Longest malformed-frame excerpt included in a log record.
const FRAME_PREVIEW_BYTES: usize = 120;

/// Upgrade handler for the `/ws` route.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serve one accepted connection end-to-end.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    counter!("ws_connections_total").increment(1);

    let (ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_loop(ws_tx, rx));

    let mut conversation_id: Option<String> = None;
    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => {
                if let Err(e) =
                    handle_frame(&state, &tx, &mut conversation_id, text.as_str()).await
                {
                    records::log_op_error(conversation_id.as_deref(), &format!("Error: {e}"));
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            // Pings and pongs are answered by axum; binary frames are not
            // part of the protocol.
            Ok(_) => {}
            Err(e) => {
                records::log_op_error(conversation_id.as_deref(), &format!("Error: {e}"));
                break;
            }
        }
    }

    if conversation_id.is_some() {
        records::log_op(conversation_id.as_deref(), "Closing connection.");
    }

    // Stop the writer, then close the socket. The peer may already be
    // gone; that close failure is logged and swallowed.
    drop(tx);
    match writer.await {
        Ok(mut ws_tx) => {
            if let Err(e) = ws_tx.close().await {
                records::log_op_error(
                    conversation_id.as_deref(),
                    &RelayError::Close(e.to_string()).to_string(),
                );
            }
        }
        Err(e) => {
            records::log_op_error(
                conversation_id.as_deref(),
                &format!("writer task failed: {e}"),
            );
        }
    }
}

/// Drain outbound frames to the socket. Returns the sink for the close
/// handshake.
async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<String>,
) -> SplitSink<WebSocket, Message> {
    while let Some(frame) = rx.recv().await {
        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
            // Peer gone: refuse further frames so in-flight pipeline
            // runs observe the failure and unwind.
            rx.close();
            break;
        }
    }
    ws_tx
}

/// Dispatch one inbound text frame.
///
/// Returns `Err` only when outbound delivery failed; every other
/// problem is handled locally and leaves the connection open.
pub(crate) async fn handle_frame(
    state: &AppState,
    outbound: &mpsc::UnboundedSender<String>,
    conversation_id: &mut Option<String>,
    raw: &str,
) -> Result<(), RelayError> {
    counter!("ws_frames_total").increment(1);

    // Parse the envelope. A frame that is not a JSON object is dropped.
    let payload: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            drop_malformed(conversation_id.as_deref(), raw, e);
            return Ok(());
        }
    };
    let frame: InboundFrame = match serde_json::from_value(payload.clone()) {
        Ok(frame) => frame,
        Err(e) => {
            drop_malformed(conversation_id.as_deref(), raw, e);
            return Ok(());
        }
    };

    records::log_received(conversation_id.as_deref(), &payload);

    // Adopt a client-supplied id; the id never changes silently.
    if let Some(uuid) = frame.uuid.clone() {
        *conversation_id = Some(uuid);
    }

    if frame.is_init() {
        records::log_op(
            conversation_id.as_deref(),
            "Initializing connection with client.",
        );
        return Ok(());
    }

    let Some(message) = frame.message else {
        return Ok(());
    };
    if message.is_empty() {
        return Ok(());
    }

    let id = conversation_id
        .get_or_insert_with(|| uuid::Uuid::now_v7().to_string())
        .clone();

    // Hold the per-id lock across the whole cycle: duplicate tabs on the
    // same id serialize here instead of losing updates.
    let entry = state.registry.conversation(&id).await;
    let mut history = entry.lock().await;
    let sink = ChannelSink::new(outbound.clone());
    let updated = state
        .pipeline
        .run(&history, message.into_turns(), Some(&sink))
        .await?;
    *history = updated;
    Ok(())
}

fn drop_malformed(uuid: Option<&str>, raw: &str, e: serde_json::Error) {
    counter!("ws_frame_parse_errors_total").increment(1);
    records::log_op_error(
        uuid,
        &format!(
            "{} (frame: {})",
            RelayError::FrameParse(e),
            preview(raw, FRAME_PREVIEW_BYTES)
        ),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
