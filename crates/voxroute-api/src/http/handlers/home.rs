//! Welcome and health endpoints.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the AI Voice Assistant API!";

/// GET / - Welcome message.
pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

/// GET /health - Liveness plus the number of stored turns.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let chat_logs = state.chat_service.count_turns().await?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chat_logs": chat_logs,
    })))
}
