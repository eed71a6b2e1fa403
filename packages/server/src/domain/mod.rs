//! Domain layer: entities, value objects, and the collaborator interfaces
//! the broadcast core depends on.

pub mod auth;
pub mod bot;
pub mod command;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod value_object;

pub use auth::{SessionAuthority, TokenVerifier};
pub use bot::{BotGateway, BotReplySource};
pub use command::{
    BOT_USERNAME, COMMAND_PREFIX, Classified, HELP_MESSAGE, STOCK_COMMAND_PREFIX, classify,
};
pub use entity::{ChatMessage, InboundMessage, MessageHistory};
pub use error::{BotGatewayError, MessagePushError, TokenError, ValueObjectError};
pub use message_pusher::{
    MessagePusher, OUTBOUND_QUEUE_CAPACITY, PusherChannel, outbound_channel,
};
pub use value_object::{ConnectionId, StockCode, Username};
