//! WebSocket connection lifecycle.
//!
//! One logical task per connection owns the frame-receive loop; a
//! writer task drains the outbound channel to the socket, so there is
//! exactly one send path. A conversation cycle runs to completion —
//! including all streamed sends — before the next frame is processed.

pub mod connection;

pub use connection::ws_handler;
