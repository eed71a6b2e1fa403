//! Request handlers.

mod http;
mod websocket;

pub use http::{delete_session, get_history, health_check, post_bot_reply, put_session};
pub use websocket::websocket_handler;
