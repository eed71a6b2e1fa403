//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Username is too long ({0} characters)")]
    UsernameTooLong(usize),

    #[error("Stock code must not be empty")]
    EmptyStockCode,

    #[error("Stock code contains whitespace: '{0}'")]
    InvalidStockCode(String),
}

/// Token verification errors
///
/// The variants are only ever logged; the peer sees a dropped connection either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token does not carry a usable identity")]
    MissingIdentity,

    #[error("Identity '{0}' is reserved")]
    ReservedIdentity(String),
}

/// Message delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Outbound queue of client '{0}' is full")]
    QueueFull(String),
}

/// Bot gateway submission errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotGatewayError {
    #[error("Bot request failed: {0}")]
    Request(String),

    #[error("Bot responded with status {0}")]
    Status(u16),

    #[error("Bot reply queue is closed")]
    ReplyQueueClosed,
}
