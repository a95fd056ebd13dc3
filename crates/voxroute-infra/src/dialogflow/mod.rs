//! Dialogflow ES dialogue gateway.
//!
//! - `client`: `DialogflowGateway`, the [`DialogueGateway`] implementation
//! - `credentials`: per-agent bearer token resolution
//! - `types`: REST request/response bodies for `detectIntent`
//!
//! [`DialogueGateway`]: voxroute_core::dialogue::DialogueGateway

pub mod client;
pub mod credentials;
pub mod types;

pub use client::DialogflowGateway;
