//! Queue-backed bot reply source.
//!
//! Replies pushed by the bot service (via `POST /api/bot/replies`) land in a
//! bounded queue; the bot reply consumer drains it one reply at a time.

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{BotGatewayError, BotReplySource};

/// Default capacity of the reply queue
pub const DEFAULT_REPLY_QUEUE_CAPACITY: usize = 64;

/// Create a connected sender/source pair.
///
/// `capacity` is clamped to at least 1.
pub fn bot_reply_channel(capacity: usize) -> (BotReplySender, ChannelBotReplySource) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        BotReplySender { sender },
        ChannelBotReplySource {
            receiver: Mutex::new(receiver),
        },
    )
}

/// Producer half, held by the HTTP surface.
#[derive(Debug, Clone)]
pub struct BotReplySender {
    sender: mpsc::Sender<String>,
}

impl BotReplySender {
    /// Enqueue a reply, waiting while the queue is full.
    pub async fn send(&self, reply: String) -> Result<(), BotGatewayError> {
        self.sender
            .send(reply)
            .await
            .map_err(|_| BotGatewayError::ReplyQueueClosed)
    }
}

/// Consumer half, drained by the bot reply consumer.
pub struct ChannelBotReplySource {
    receiver: Mutex<mpsc::Receiver<String>>,
}

#[async_trait]
impl BotReplySource for ChannelBotReplySource {
    async fn next_reply(&self) -> Option<String> {
        self.receiver.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_are_received_in_order() {
        // テスト項目: 送信した返信が順番通りに受信される
        // given (前提条件):
        let (sender, source) = bot_reply_channel(4);

        // when (操作):
        sender.send("first".to_string()).await.unwrap();
        sender.send("second".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(source.next_reply().await, Some("first".to_string()));
        assert_eq!(source.next_reply().await, Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_source_closes_when_senders_dropped() {
        // テスト項目: 送信側が全て破棄されると None が返る
        // given (前提条件):
        let (sender, source) = bot_reply_channel(1);

        // when (操作):
        drop(sender);

        // then (期待する結果):
        assert_eq!(source.next_reply().await, None);
    }

    #[tokio::test]
    async fn test_send_fails_when_source_dropped() {
        // テスト項目: 受信側が破棄されていると送信は ReplyQueueClosed になる
        // given (前提条件):
        let (sender, source) = bot_reply_channel(0);
        drop(source);

        // when (操作):
        let result = sender.send("lost".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(BotGatewayError::ReplyQueueClosed));
    }
}
