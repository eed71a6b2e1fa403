//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, InboundMessage};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

/// Client-supplied `username` and `timestamp` are discarded here.
impl From<dto::MessageDto> for InboundMessage {
    fn from(dto: dto::MessageDto) -> Self {
        Self {
            token: dto.token,
            content: dto.content,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for dto::MessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            username: model.username.as_str().to_string(),
            content: model.content.clone(),
            token: String::new(),
            timestamp: model.timestamp.clone(),
        }
    }
}

/// Convert a history snapshot into its outbound wire form.
pub fn history_to_dto(history: &[ChatMessage]) -> Vec<dto::MessageDto> {
    history.iter().map(dto::MessageDto::from).collect()
}
