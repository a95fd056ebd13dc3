//! SQLite chat log repository implementation.
//!
//! Implements `ChatLogRepository` from `voxroute-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, writes on the writer
//! pool and reads on the reader pool.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;
use voxroute_core::chat::repository::ChatLogRepository;
use voxroute_types::agent::AgentCategory;
use voxroute_types::chat::ChatLogEntry;
use voxroute_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatLogRepository`.
pub struct SqliteChatLogRepository {
    pool: DatabasePool,
}

impl SqliteChatLogRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatLogEntry.
struct ChatLogRow {
    id: String,
    session_id: String,
    user_input: String,
    agent: Option<String>,
    intent: String,
    response: String,
    timestamp: String,
}

impl ChatLogRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_input: row.try_get("user_input")?,
            agent: row.try_get("agent")?,
            intent: row.try_get("intent")?,
            response: row.try_get("response")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_entry(self) -> Result<ChatLogEntry, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat log id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))?;
        let agent = self
            .agent
            .as_deref()
            .map(str::parse::<AgentCategory>)
            .transpose()
            .map_err(RepositoryError::Query)?;
        let timestamp = parse_datetime(&self.timestamp)?;

        Ok(ChatLogEntry {
            id,
            session_id,
            user_input: self.user_input,
            agent,
            intent: self.intent,
            response: self.response,
            timestamp,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that lexical order matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl ChatLogRepository for SqliteChatLogRepository {
    async fn append(&self, entry: &ChatLogEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_logs (id, session_id, user_input, agent, intent, response, timestamp)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(entry.session_id.to_string())
        .bind(&entry.user_input)
        .bind(entry.agent.map(|a| a.as_str()))
        .bind(&entry.intent)
        .bind(&entry.response)
        .bind(format_datetime(&entry.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_session(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ChatLogEntry>, RepositoryError> {
        // SQLite treats LIMIT -1 as "no limit".
        let rows = sqlx::query(
            "SELECT * FROM chat_logs WHERE session_id = ? ORDER BY timestamp ASC, id ASC LIMIT ?",
        )
        .bind(session_id.to_string())
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let log_row =
                ChatLogRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entries.push(log_row.into_entry()?);
        }

        Ok(entries)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chat_logs")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(n as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::open(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_append_and_list_by_session() {
        let repo = SqliteChatLogRepository::new(test_pool().await);
        let session = Uuid::now_v7();

        let first = ChatLogEntry::new(session, "tell me a joke", Some(AgentCategory::Jokes), "joke.tell", "Knock knock.");
        let second = ChatLogEntry::new(session, "xyz", None, "unknown", "I'm not sure how to respond to that.");
        repo.append(&first).await.unwrap();
        repo.append(&second).await.unwrap();

        let entries = repo.list_by_session(&session, None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first.id);
        assert_eq!(entries[0].agent, Some(AgentCategory::Jokes));
        assert_eq!(entries[0].user_input, "tell me a joke");
        assert_eq!(entries[0].response, "Knock knock.");
        assert_eq!(entries[1].agent, None);
        assert_eq!(entries[1].intent, "unknown");
    }

    #[tokio::test]
    async fn test_faq_wire_name_round_trips() {
        let repo = SqliteChatLogRepository::new(test_pool().await);
        let session = Uuid::now_v7();
        let entry = ChatLogEntry::new(session, "what is compute engine", Some(AgentCategory::Faq), "faq.engine", "A VM service.");
        repo.append(&entry).await.unwrap();

        let agent: (Option<String>,) = sqlx::query_as("SELECT agent FROM chat_logs WHERE id = ?")
            .bind(entry.id.to_string())
            .fetch_one(&repo.pool.reader)
            .await
            .unwrap();
        assert_eq!(agent.0.as_deref(), Some("FAQ"));

        let entries = repo.list_by_session(&session, None).await.unwrap();
        assert_eq!(entries[0].agent, Some(AgentCategory::Faq));
    }

    #[tokio::test]
    async fn test_list_respects_session_and_limit() {
        let repo = SqliteChatLogRepository::new(test_pool().await);
        let session_a = Uuid::now_v7();
        let session_b = Uuid::now_v7();

        for i in 0..3 {
            let entry = ChatLogEntry::new(session_a, format!("turn {i}"), None, "unknown", "fallback");
            repo.append(&entry).await.unwrap();
        }
        let other = ChatLogEntry::new(session_b, "hello", Some(AgentCategory::SmallTalk), "greet", "Hi!");
        repo.append(&other).await.unwrap();

        let limited = repo.list_by_session(&session_a, Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].user_input, "turn 0");

        let b_entries = repo.list_by_session(&session_b, None).await.unwrap();
        assert_eq!(b_entries.len(), 1);
        assert_eq!(b_entries[0].user_input, "hello");

        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let repo = SqliteChatLogRepository::new(test_pool().await);
        let entries = repo.list_by_session(&Uuid::now_v7(), None).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = SqliteChatLogRepository::new(test_pool().await);
        let entry = ChatLogEntry::new(Uuid::now_v7(), "hi", Some(AgentCategory::SmallTalk), "greet", "Hello");
        repo.append(&entry).await.unwrap();
        let err = repo.append(&entry).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
