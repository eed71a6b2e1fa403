//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続レジストリ（接続 ID と `UnboundedSender` のマップ）の管理
//! - 履歴スナップショットの JSON 化と、各接続への送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 接続ごとの書き込みタスクがソケットへの書き込みに失敗すると受信側が破棄されるため、
//! 以降の送信はここで失敗として検出されます。
//! 送信キューは有界で、満杯（読み取りが止まっている接続）の場合も待たずに失敗を返します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{ChatMessage, ConnectionId, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::conversion::history_to_dto,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
/// pusher.push_history(&connection_id, &history).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(connection_id).is_some();
        if removed {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
        removed
    }

    async fn connected_client_ids(&self) -> Vec<ConnectionId> {
        let clients = self.clients.lock().await;
        clients.keys().copied().collect()
    }

    async fn count_connected_clients(&self) -> usize {
        let clients = self.clients.lock().await;
        clients.len()
    }

    async fn push_history(
        &self,
        connection_id: &ConnectionId,
        history: &[ChatMessage],
    ) -> Result<(), MessagePushError> {
        let payload = serde_json::to_string(&history_to_dto(history))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;

        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;

        sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(connection_id.to_string()),
            TrySendError::Closed(_) => {
                MessagePushError::PushFailed("outbound channel closed".to_string())
            }
        })?;
        tracing::trace!("Pushed history to connection '{}'", connection_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{OUTBOUND_QUEUE_CAPACITY, Username, outbound_channel},
        infrastructure::dto::websocket::MessageDto,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の接続レジストリ操作
    // - push_history: 特定の接続への履歴送信
    // - エラーハンドリング（存在しない接続、破棄された接続）
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher はブロードキャストエンジンから呼ばれる通信層の中核
    // - 送信失敗が正しく検出されないと、死んだ接続がレジストリに残り続ける
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録・登録解除・一覧取得
    // 2. push_history の成功ケース
    // 3. push_history の失敗ケース（接続が存在しない / 受信側が破棄済み / キューが満杯）
    // ========================================

    fn history() -> Vec<ChatMessage> {
        vec![ChatMessage::new(
            Username::new("alice".to_string()).unwrap(),
            "Hello".to_string(),
            "2024-01-01 00:00:00".to_string(),
        )]
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        // テスト項目: 登録した接続が一覧に現れ、登録解除で消える
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = outbound_channel();
        let connection_id = ConnectionId::generate();

        // when (操作):
        pusher.register_client(connection_id, tx).await;
        let ids = pusher.connected_client_ids().await;
        let first_removal = pusher.unregister_client(&connection_id).await;
        let second_removal = pusher.unregister_client(&connection_id).await;

        // then (期待する結果): 登録解除は冪等
        assert_eq!(ids, vec![connection_id]);
        assert!(first_removal);
        assert!(!second_removal);
        assert_eq!(pusher.count_connected_clients().await, 0);
    }

    #[tokio::test]
    async fn test_push_history_success() {
        // テスト項目: 特定の接続に履歴を JSON 配列として送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = outbound_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;

        // when (操作):
        let result = pusher.push_history(&connection_id, &history()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let frame = rx.recv().await.unwrap();
        let decoded: Vec<MessageDto> = serde_json::from_str(&frame).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].username, "alice");
        assert_eq!(decoded[0].token, "");
    }

    #[tokio::test]
    async fn test_push_history_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .push_history(&ConnectionId::generate(), &history())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_history_to_dropped_receiver_fails() {
        // テスト項目: 受信側が破棄された接続への送信は PushFailed になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = outbound_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_history(&connection_id, &history()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_push_history_to_stalled_receiver_fails_when_queue_is_full() {
        // テスト項目: 読み取りが止まった接続は、送信キューが満杯になると QueueFull になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = outbound_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        for _ in 0..OUTBOUND_QUEUE_CAPACITY {
            pusher.push_history(&connection_id, &history()).await.unwrap();
        }

        // when (操作):
        let result = pusher.push_history(&connection_id, &history()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::QueueFull(_))));
    }
}
