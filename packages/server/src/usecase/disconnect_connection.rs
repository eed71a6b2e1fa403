//! UseCase: 切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

/// 切断のユースケース
pub struct DisconnectConnectionUseCase {
    /// MessagePusher（接続レジストリの抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectConnectionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続をレジストリから削除する
    ///
    /// ブロードキャストエンジンが配信失敗で先に削除している場合もあるため冪等。
    /// 削除した場合は `true` を返す。
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        self.message_pusher.unregister_client(connection_id).await
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_connections(&self) -> usize {
        self.message_pusher.count_connected_clients().await
    }
}
