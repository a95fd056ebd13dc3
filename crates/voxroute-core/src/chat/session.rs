//! Conversation identity.
//!
//! Every turn carries an explicit session id supplied by the caller (the
//! `X-Session-Id` header over HTTP). Turns without one start a new session.

use uuid::Uuid;

/// Header used to carry the session id in both directions.
pub const SESSION_HEADER: &str = "x-session-id";

/// Mint a new time-sortable session id.
pub fn new_session_id() -> Uuid {
    Uuid::now_v7()
}

/// Resolve the session for a turn.
///
/// - `None` or blank -> a fresh session id
/// - a valid UUID -> that id
/// - anything else -> `Err` with a message for the caller
pub fn resolve_session_id(raw: Option<&str>) -> Result<Uuid, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(new_session_id()),
        Some(value) => {
            Uuid::parse_str(value).map_err(|_| format!("invalid session id: '{value}'"))
        }
    }
}
