//! UseCase layer: the broadcast engine and the operations driven by
//! connection handlers and the bot reply consumer.

pub mod bot_reply;
pub mod broadcast;
pub mod command_dispatch;
pub mod connect_connection;
pub mod disconnect_connection;
pub mod error;
pub mod receive_message;
pub mod timestamp;
pub mod view_history;

pub use bot_reply::BotReplyConsumer;
pub use broadcast::{BroadcastEngine, BroadcastHandle};
pub use command_dispatch::CommandDispatcher;
pub use connect_connection::ConnectConnectionUseCase;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::{EngineError, HistoryAccessError, ReceiveError};
pub use receive_message::{Disposition, ReceiveMessageUseCase};
pub use timestamp::TimestampIssuer;
pub use view_history::ViewHistoryUseCase;
