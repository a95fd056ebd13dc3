//! Session log read-back.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use voxroute_types::chat::ChatLogEntry;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
}

/// GET /sessions/{id}/logs - Stored turns of a session, oldest first.
pub async fn get_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<ChatLogEntry>>, AppError> {
    let session_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::Validation(format!("invalid session id: '{id}'")))?;

    if let Some(limit) = query.limit {
        if limit < 0 {
            return Err(AppError::Validation("limit must not be negative".to_string()));
        }
    }

    let entries = state.chat_service.history(&session_id, query.limit).await?;
    Ok(Json(entries))
}
