//! HTTP API layer for voxroute.
//!
//! Plain JSON bodies on `/` and `/chat/`, with the conversation id carried in
//! the `X-Session-Id` header.

pub mod error;
pub mod handlers;
pub mod router;
