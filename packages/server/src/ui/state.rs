//! Server state shared by all handlers.

use std::sync::Arc;

use crate::{
    infrastructure::{auth::InMemorySessionAuthority, bot::BotReplySender},
    usecase::{
        ConnectConnectionUseCase, DisconnectConnectionUseCase, ReceiveMessageUseCase,
        ViewHistoryUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectConnectionUseCase（接続のユースケース）
    pub connect_connection_usecase: Arc<ConnectConnectionUseCase>,
    /// DisconnectConnectionUseCase（切断のユースケース）
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// ReceiveMessageUseCase（受信メッセージ処理のユースケース）
    pub receive_message_usecase: Arc<ReceiveMessageUseCase>,
    /// ViewHistoryUseCase（履歴閲覧のユースケース）
    pub view_history_usecase: Arc<ViewHistoryUseCase>,
    /// Sessions opened and closed by the login flow
    pub session_authority: Arc<InMemorySessionAuthority>,
    /// Producer half of the bot reply queue
    pub bot_replies: BotReplySender,
    /// Shared secret of the bot service and the login flow
    pub internal_secret: String,
}
