//! UseCase error types.

use thiserror::Error;

use crate::domain::TokenError;

/// The broadcast engine is no longer accepting work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Broadcast engine has stopped")]
    Stopped,
}

/// Reasons an inbound message ends its connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] TokenError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Reasons the history page is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryAccessError {
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] TokenError),

    #[error("No active session for '{0}'")]
    NoSession(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
