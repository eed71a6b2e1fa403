//! UI layer: the Axum server, its shared state, and the HTTP / WebSocket handlers.

mod handler;
mod middleware;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, ServerError};
