//! Entities of the chat stream.

use std::{collections::VecDeque, num::NonZeroUsize};

use super::value_object::Username;

/// An accepted message.
///
/// Only messages that passed authorization (or were authored by the bot) are
/// ever constructed as `ChatMessage`; the inbound token is not carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub username: Username,
    pub content: String,
    /// Acceptance time, formatted by the server
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(username: Username, content: String, timestamp: String) -> Self {
        Self {
            username,
            content,
            timestamp,
        }
    }

    /// Create a message authored by the bot sentinel identity.
    pub fn from_bot(content: String, timestamp: String) -> Self {
        Self {
            username: Username::bot(),
            content,
            timestamp,
        }
    }
}

/// A decoded inbound frame, not yet authorized.
///
/// The client-supplied username and timestamp are dropped at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub token: String,
    pub content: String,
}

/// Bounded, append-only message history with FIFO eviction.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    capacity: NonZeroUsize,
    messages: VecDeque<ChatMessage>,
}

impl MessageHistory {
    /// Default number of messages retained for replay
    pub const DEFAULT_CAPACITY: usize = 50;

    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity.get()),
        }
    }

    /// Append a message, evicting the oldest one first when full.
    ///
    /// Returns the evicted message, if any.
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        let evicted = if self.messages.len() >= self.capacity.get() {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    /// Messages in acceptance order, oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(Self::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}
