//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    domain::Username,
    infrastructure::dto::{
        conversion::history_to_dto,
        http::{HealthDto, HistoryDto},
    },
    ui::state::AppState,
    usecase::HistoryAccessError,
};

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub token: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let connections = state
        .disconnect_connection_usecase
        .count_remaining_connections()
        .await;

    Json(HealthDto {
        status: "ok".to_string(),
        connections,
    })
}

/// Current history for an authenticated user.
///
/// This is the entry page of the chat: the token must verify and its identity
/// must hold an open session.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryDto>, StatusCode> {
    match state.view_history_usecase.execute(&query.token).await {
        Ok((username, history)) => Ok(Json(HistoryDto {
            username: username.into_string(),
            messages: history_to_dto(&history),
        })),
        Err(HistoryAccessError::Engine(e)) => {
            tracing::error!("Failed to read history: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(e) => {
            tracing::debug!("History request rejected: {}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Reply delivery from the bot service (plain-text body).
///
/// Mounted behind the internal secret guard.
pub async fn post_bot_reply(State(state): State<Arc<AppState>>, body: String) -> StatusCode {
    if body.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    match state.bot_replies.send(body).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            tracing::warn!("Bot reply rejected: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Open a session for `username` (called by the login flow, behind the internal secret guard).
pub async fn put_session(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> StatusCode {
    let Ok(username) = Username::try_from(username) else {
        return StatusCode::BAD_REQUEST;
    };

    if state.session_authority.sign_in(username).await {
        StatusCode::CREATED
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Close the session of `username` (called by the login flow).
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> StatusCode {
    let Ok(username) = Username::try_from(username) else {
        return StatusCode::BAD_REQUEST;
    };

    if state.session_authority.sign_out(&username).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
