//! Fire-and-forget bot command dispatch.
//!
//! Each stock command is handed to the bot gateway on its own detached task.
//! There is no return channel: the caller never learns whether submission
//! succeeded, and a failure is only logged. The bot's answer, if any, arrives
//! later and uncorrelated through the bot reply consumer.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{BotGateway, StockCode};

#[derive(Clone)]
pub struct CommandDispatcher {
    gateway: Arc<dyn BotGateway>,
}

impl CommandDispatcher {
    pub fn new(gateway: Arc<dyn BotGateway>) -> Self {
        Self { gateway }
    }

    /// Submit `code` on a detached task and return immediately.
    ///
    /// The returned handle is only for tests; production callers drop it.
    pub fn dispatch_detached(&self, code: StockCode) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            match gateway.submit_command(&code).await {
                Ok(()) => tracing::debug!("Stock command '{}' submitted to bot", code),
                Err(e) => tracing::warn!("Stock command '{}' dropped: {}", code, e),
            }
        })
    }
}
