//! MessagePusher trait 定義
//!
//! 接続レジストリとクライアントへの配信のインターフェースです。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{entity::ChatMessage, error::MessagePushError, value_object::ConnectionId};

/// Snapshots that may wait in one connection's outbound queue.
///
/// Each snapshot supersedes the previous ones, so a connection that falls
/// this far behind is treated as failed.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 16;

/// Outbound channel of one connection; its writer task owns the socket sink.
pub type PusherChannel = mpsc::Sender<String>;

/// Create the outbound channel of one connection.
pub fn outbound_channel() -> (PusherChannel, mpsc::Receiver<String>) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}

/// Connection registry plus delivery.
///
/// Presence in the registry means the connection is live. A connection is
/// removed by its own handler on read failure, or by the broadcast engine
/// when delivery to it fails.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除。登録されていた場合は `true` を返す
    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool;

    /// 登録中の全ての接続 ID（スナップショット）
    async fn connected_client_ids(&self) -> Vec<ConnectionId>;

    /// 登録中の接続数
    async fn count_connected_clients(&self) -> usize;

    /// 履歴スナップショットを 1 つの接続に送信
    ///
    /// 送信キューが満杯（読み取りが止まっている接続）の場合も失敗として扱う
    async fn push_history(
        &self,
        connection_id: &ConnectionId,
        history: &[ChatMessage],
    ) -> Result<(), MessagePushError>;
}
