//! UseCase: ブロードキャストエンジン
//!
//! 受理済みメッセージの唯一の直列化ポイントです。エンジンは単一のタスクとして動作し、
//! 履歴（`MessageHistory`）の唯一の書き込み手として、メッセージを 1 件ずつ取り出して
//! 履歴に追加し、更新後の履歴スナップショットを全ての接続に配信します。
//! 新規接続の登録も同じキューを通るため、参加時のリプレイとブロードキャストが
//! 重複したり入れ替わったりすることはありません。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastHandle::submit() から BroadcastEngine::run() までの配信ラウンド
//! - 新規接続の登録とリプレイ、履歴スナップショットの取得
//!
//! ### なぜこのテストが必要か
//! - 履歴の上限と到着順の全順序を保証する
//! - 1 つの接続への配信失敗が他の接続への配信を妨げないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数接続へのブロードキャスト
//! - 異常系：書き込みに失敗する接続（レジストリから削除される）
//! - エッジケース：接続が 1 つもない状態でのブロードキャスト

use std::{num::NonZeroUsize, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{ChatMessage, ConnectionId, MessageHistory, MessagePusher, PusherChannel};

use super::error::EngineError;

/// Default capacity of the ordering point
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Work items flowing through the ordering point.
#[derive(Debug)]
enum EngineCommand {
    /// Accept a message and fan out the updated history
    Submit(ChatMessage),
    /// Register a connection and send it the current history
    Join(ConnectionId, PusherChannel),
    /// Read the current history
    Snapshot(oneshot::Sender<Vec<ChatMessage>>),
}

/// Cloneable entry point into the broadcast engine.
///
/// Every handle feeds the same bounded queue, so all submissions, from any
/// connection or from the bot, are totally ordered by arrival.
#[derive(Debug, Clone)]
pub struct BroadcastHandle {
    sender: mpsc::Sender<EngineCommand>,
}

impl BroadcastHandle {
    /// Submit an already-classified message.
    ///
    /// Waits while the queue is full, which back-pressures only the caller.
    pub async fn submit(&self, message: ChatMessage) -> Result<(), EngineError> {
        self.sender
            .send(EngineCommand::Submit(message))
            .await
            .map_err(|_| EngineError::Stopped)
    }

    /// Register `connection_id` and replay the current history to it.
    ///
    /// The connection receives exactly the snapshots of rounds processed
    /// after its join, each once.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), EngineError> {
        self.sender
            .send(EngineCommand::Join(connection_id, sender))
            .await
            .map_err(|_| EngineError::Stopped)
    }

    /// Current history, ordered after everything submitted before this call.
    pub async fn history(&self) -> Result<Vec<ChatMessage>, EngineError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EngineCommand::Snapshot(respond_to))
            .await
            .map_err(|_| EngineError::Stopped)?;
        response.await.map_err(|_| EngineError::Stopped)
    }
}

/// The single consumer of the ordering point and sole owner of the history.
pub struct BroadcastEngine {
    receiver: mpsc::Receiver<EngineCommand>,
    history: MessageHistory,
    /// MessagePusher（接続レジストリと配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastEngine {
    /// Create the engine and the handle feeding it.
    pub fn new(
        history: MessageHistory,
        message_pusher: Arc<dyn MessagePusher>,
        queue_capacity: NonZeroUsize,
    ) -> (Self, BroadcastHandle) {
        let (sender, receiver) = mpsc::channel(queue_capacity.get());
        let engine = Self {
            receiver,
            history,
            message_pusher,
        };
        (engine, BroadcastHandle { sender })
    }

    /// Run the engine on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process work until every handle has been dropped.
    pub async fn run(mut self) {
        tracing::info!(
            "Broadcast engine started (history capacity: {})",
            self.history.capacity()
        );

        while let Some(command) = self.receiver.recv().await {
            match command {
                EngineCommand::Submit(message) => self.broadcast(message).await,
                EngineCommand::Join(connection_id, sender) => {
                    self.join(connection_id, sender).await
                }
                EngineCommand::Snapshot(respond_to) => {
                    // The requester may have gone away; nothing to do then.
                    let _ = respond_to.send(self.history.snapshot());
                }
            }
        }

        tracing::info!("Broadcast engine stopped");
    }

    /// One broadcast round: append, then deliver the updated history to every connection.
    async fn broadcast(&mut self, message: ChatMessage) {
        tracing::debug!(
            "Accepting message from '{}' ({} bytes)",
            message.username,
            message.content.len()
        );
        if let Some(evicted) = self.history.push(message) {
            tracing::debug!("Evicted oldest message from '{}'", evicted.username);
        }

        let snapshot = self.history.snapshot();
        let targets = self.message_pusher.connected_client_ids().await;
        let mut delivered = 0usize;

        for target in targets {
            if self.deliver(&target, &snapshot).await {
                delivered += 1;
            }
        }

        tracing::debug!("Broadcast round delivered to {} connection(s)", delivered);
    }

    async fn join(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        let snapshot = self.history.snapshot();
        if self.deliver(&connection_id, &snapshot).await {
            tracing::debug!(
                "Replayed {} message(s) to connection '{}'",
                snapshot.len(),
                connection_id
            );
        }
    }

    /// Deliver to one connection; a failure removes that connection only.
    async fn deliver(&self, connection_id: &ConnectionId, snapshot: &[ChatMessage]) -> bool {
        match self
            .message_pusher
            .push_history(connection_id, snapshot)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Dropping connection '{}' after failed delivery: {}",
                    connection_id,
                    e
                );
                self.message_pusher.unregister_client(connection_id).await;
                false
            }
        }
    }
}
