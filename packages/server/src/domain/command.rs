//! In-band command syntax.
//!
//! Content starting with [`COMMAND_PREFIX`] is never broadcast as chat: a
//! well-formed `/stock=<code>` goes to the bot gateway, anything else is
//! answered with [`HELP_MESSAGE`].

use super::value_object::StockCode;

/// Character that marks a message as a command
pub const COMMAND_PREFIX: char = '/';

/// Prefix of the only known command
pub const STOCK_COMMAND_PREFIX: &str = "/stock=";

/// Sender identity of every bot-authored message
pub const BOT_USERNAME: &str = "Bot";

/// Reply to any command that is not a well-formed stock command
pub const HELP_MESSAGE: &str = "I'm sorry, I didn't understand that command. Please use /stock=stock_code format to get stock quotes.";

/// Result of classifying message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Regular chat message
    Chat,
    /// `/stock=<code>` with a usable code
    StockQuote(StockCode),
    /// Any other content starting with the command prefix
    UnknownCommand,
}

/// Classify raw message content.
///
/// `/stock=` with an empty or malformed code counts as an unknown command.
pub fn classify(content: &str) -> Classified {
    if !content.starts_with(COMMAND_PREFIX) {
        return Classified::Chat;
    }

    match content.strip_prefix(STOCK_COMMAND_PREFIX) {
        Some(code) => match StockCode::new(code) {
            Ok(code) => Classified::StockQuote(code),
            Err(_) => Classified::UnknownCommand,
        },
        None => Classified::UnknownCommand,
    }
}
