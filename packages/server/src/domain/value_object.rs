//! Value objects used by the broadcast core.

use std::fmt;

use uuid::Uuid;

use super::{command::BOT_USERNAME, error::ValueObjectError};

/// Longest accepted username, in characters.
pub const USERNAME_MAX_LEN: usize = 64;

/// Handle identifying one live connection in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sender identity, resolved from a verified token (or the bot sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        let len = value.chars().count();
        if len > USERNAME_MAX_LEN {
            return Err(ValueObjectError::UsernameTooLong(len));
        }
        Ok(Self(value))
    }

    /// The sentinel identity of bot-authored messages
    pub fn bot() -> Self {
        Self(BOT_USERNAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stock code extracted from a `/stock=<code>` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCode(String);

impl StockCode {
    /// Surrounding whitespace is trimmed; inner whitespace is rejected.
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyStockCode);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::InvalidStockCode(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
