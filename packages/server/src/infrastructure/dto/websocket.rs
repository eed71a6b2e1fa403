//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Wire shape of a message, in both directions.
///
/// Inbound frames only need `content` and `token`; every field defaults to an
/// empty string when missing. Outbound frames are a JSON array of these
/// (the full history snapshot) with `token` always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageDto {
    pub username: String,
    pub content: String,
    pub token: String,
    pub timestamp: String,
}
