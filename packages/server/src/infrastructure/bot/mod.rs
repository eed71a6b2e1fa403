//! Bot collaborator implementations.
//!
//! - `http`: submits stock codes to the bot service over HTTP
//! - `channel`: in-process queue the bot service's replies are delivered into

pub mod channel;
pub mod http;

pub use channel::{BotReplySender, ChannelBotReplySource, bot_reply_channel};
pub use http::HttpBotGateway;
