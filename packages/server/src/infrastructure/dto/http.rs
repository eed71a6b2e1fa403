//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MessageDto;

/// Response of `GET /api/history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDto {
    pub username: String,
    pub messages: Vec<MessageDto>,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
}
