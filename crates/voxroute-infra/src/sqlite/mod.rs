//! SQLite storage layer.
//!
//! Chat log repository backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod chat_log;
pub mod pool;
