//! Hiroba broadcast engine library.
//!
//! This library provides the single-room chat core: connection registry,
//! bounded message history, per-connection receive loop, and the bot command
//! path, wired together behind an Axum WebSocket server.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
