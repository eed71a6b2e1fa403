//! Bot collaborator interfaces.
//!
//! Submitting a command and receiving its reply are deliberately separate:
//! replies arrive uncorrelated on [`BotReplySource`], not as a return value
//! of [`BotGateway::submit_command`].

use async_trait::async_trait;

use super::{error::BotGatewayError, value_object::StockCode};

/// Outbound half: hands a stock code to the external bot service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotGateway: Send + Sync {
    async fn submit_command(&self, code: &StockCode) -> Result<(), BotGatewayError>;
}

/// Inbound half: the stream of bot replies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotReplySource: Send + Sync {
    /// Wait for the next reply. `None` once the source is closed for good.
    async fn next_reply(&self) -> Option<String>;
}
