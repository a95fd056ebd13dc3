//! Chat turn handler.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use voxroute_core::chat::session::{SESSION_HEADER, resolve_session_id};
use voxroute_types::chat::ChatRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat/ - Route one utterance and return the agent's reply.
///
/// The session comes from `X-Session-Id` (minted when absent) and is echoed
/// back in the same header.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let raw_session = match headers.get(SESSION_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::Validation("session id is not valid ASCII".to_string()))?,
        ),
        None => None,
    };
    let session_id = resolve_session_id(raw_session).map_err(AppError::Validation)?;

    let reply = state
        .chat_service
        .handle_turn(session_id, &request.user_input)
        .await;

    Ok(([(SESSION_HEADER, session_id.to_string())], Json(reply)))
}
