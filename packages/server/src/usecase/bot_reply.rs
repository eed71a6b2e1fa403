//! Bot reply consumer.
//!
//! A long-running task that turns every reply from the bot into a
//! bot-authored message and submits it through the same ordering point as
//! human chat. Replies get no priority and carry no link to the command that
//! triggered them.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{BotReplySource, ChatMessage};

use super::{broadcast::BroadcastHandle, timestamp::TimestampIssuer};

pub struct BotReplyConsumer {
    source: Arc<dyn BotReplySource>,
    broadcast: BroadcastHandle,
    timestamps: TimestampIssuer,
}

impl BotReplyConsumer {
    pub fn new(
        source: Arc<dyn BotReplySource>,
        broadcast: BroadcastHandle,
        timestamps: TimestampIssuer,
    ) -> Self {
        Self {
            source,
            broadcast,
            timestamps,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Forward replies until the source closes or the engine stops.
    pub async fn run(self) {
        tracing::info!("Bot reply consumer started");

        while let Some(reply) = self.source.next_reply().await {
            let message = ChatMessage::from_bot(reply, self.timestamps.issue());
            if let Err(e) = self.broadcast.submit(message).await {
                tracing::warn!("Bot reply consumer stopping: {}", e);
                return;
            }
        }

        tracing::info!("Bot reply source closed");
    }
}
