//! Guard for the routes only trusted services may call.
//!
//! The bot service and the login flow authenticate with a shared secret sent
//! as `Authorization: Bearer <secret>`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::state::AppState;

/// Reject requests that do not carry the internal secret.
pub async fn require_internal_secret(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|secret| secrets_match(secret, &state.internal_secret));

    if !authorized {
        tracing::warn!(
            "Rejected unauthenticated {} {}",
            request.method(),
            request.uri().path()
        );
        return StatusCode::UNAUTHORIZED.into_response();
    }

    next.run(request).await
}

/// Compare without short-circuiting on the first differing byte.
fn secrets_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
