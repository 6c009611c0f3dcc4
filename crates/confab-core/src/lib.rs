//! # confab-core
//!
//! Foundation types for the confab chat relay.
//!
//! This crate provides the shared vocabulary the other confab crates depend on:
//!
//! - **Turns**: [`turns::ConversationTurn`] with a closed [`turns::Role`] enum,
//!   and [`turns::InboundTurn`] for heterogeneous client-supplied turn shapes
//! - **Normalization**: [`normalize::normalize`] and
//!   [`normalize::ensure_system_prompt`]
//! - **Stream events**: [`events::StreamEvent`] — the single-key JSON objects
//!   sent back over a connection during generation
//! - **Errors**: [`errors::SinkError`] for event-sink delivery failures
//! - **Text**: [`text::preview`] for UTF-8-safe log previews
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other confab crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod normalize;
pub mod text;
pub mod turns;
