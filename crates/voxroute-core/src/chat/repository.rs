//! ChatLogRepository trait definition.
//!
//! Implementations live in voxroute-infra (e.g., `SqliteChatLogRepository`).

use uuid::Uuid;
use voxroute_types::chat::ChatLogEntry;
use voxroute_types::error::RepositoryError;

/// Append-only store of routed chat turns.
pub trait ChatLogRepository: Send + Sync {
    /// Durably append one turn.
    fn append(
        &self,
        entry: &ChatLogEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Turns of one session, oldest first.
    fn list_by_session(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatLogEntry>, RepositoryError>> + Send;

    /// Total number of stored turns.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
