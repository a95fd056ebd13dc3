//! Chat log database connection: a single-writer / multi-reader SQLite pair
//! in WAL mode.
//!
//! Turns are appended from many concurrent requests, but SQLite admits one
//! writer at a time, so appends are funneled through a one-connection pool
//! while history and count queries use a separate read-only pool.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const READER_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reader and writer pools over the same chat log file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

/// Accept either a `sqlite:` URL or a bare file path.
///
/// Bare paths open read-write and create the file when missing.
pub fn normalize_database_url(database: &str) -> String {
    let database = database.trim();
    if database.starts_with("sqlite:") {
        database.to_string()
    } else {
        format!("sqlite://{database}?mode=rwc")
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl DatabasePool {
    /// Open the chat log at `database` (URL or path) and apply migrations.
    ///
    /// In-memory databases are rejected: the reader pool would see its own
    /// empty database instead of the writer's.
    pub async fn open(database: &str) -> Result<Self, sqlx::Error> {
        let url = normalize_database_url(database);
        if is_in_memory(&url) {
            return Err(sqlx::Error::Configuration(
                "the chat log needs a file-backed SQLite database".into(),
            ));
        }

        let options = SqliteConnectOptions::from_str(&url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(url = %url, "Chat log database ready");

        Ok(Self { reader, writer })
    }
}
