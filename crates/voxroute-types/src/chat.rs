//! Chat turn types: HTTP request/reply bodies and persisted log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentCategory;

/// Body of `POST /chat/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
}

/// Body returned from `POST /chat/`.
///
/// `agent` serializes as `null` when the turn was not routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub agent: Option<AgentCategory>,
    pub intent: String,
    pub response: String,
}

/// A single routed turn, written once to the chat log and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub id: Uuid,
    /// Conversation the turn belongs to.
    pub session_id: Uuid,
    pub user_input: String,
    /// `None` when no agent matched.
    pub agent: Option<AgentCategory>,
    pub intent: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatLogEntry {
    /// Build a fresh entry stamped with a v7 id and the current time.
    pub fn new(
        session_id: Uuid,
        user_input: impl Into<String>,
        agent: Option<AgentCategory>,
        intent: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            user_input: user_input.into(),
            agent,
            intent: intent.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}
