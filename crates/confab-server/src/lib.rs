//! # confab-server
//!
//! The conversation-scoped streaming relay: everything between an open
//! WebSocket and the completion provider.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `wire` | Inbound frame envelope and message payload shapes |
//! | `sink` | [`sink::EventSink`] capability + connection/buffer impls |
//! | `pipeline` | Per-message two-stage flow: pre-check, then generation |
//! | `registry` | Conversation id → history map, per-id serialization |
//! | `records` | Structured per-connection log records |
//! | `websocket` | Connection lifecycle: accept, frame loop, close |
//! | `app` | Service state and axum router construction |
//! | `testing` | Scripted/failing provider stubs for tests |
//!
//! ## Data Flow
//!
//! `websocket::connection` receives a frame → `wire` parses the envelope
//! → `pipeline` runs pre-check + generation, emitting [`confab_core::events::StreamEvent`]s
//! through a `sink` bound to the connection → `registry` stores the
//! augmented history.

#![deny(unsafe_code)]

pub mod app;
pub mod errors;
pub mod pipeline;
pub mod records;
pub mod registry;
pub mod sink;
pub mod testing;
pub mod websocket;
pub mod wire;

pub use app::AppState;
pub use errors::RelayError;
pub use pipeline::ChatPipeline;
pub use registry::SessionRegistry;
