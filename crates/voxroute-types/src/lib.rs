//! Shared domain types for voxroute.
//!
//! Agent categories, chat log entries, detected intents, configuration
//! structures, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
