//! Dialogue backend abstraction.
//!
//! Defines the `DialogueGateway` port the chat service uses to resolve an
//! intent and fulfillment text for a routed utterance. The Dialogflow
//! implementation lives in voxroute-infra.

pub mod gateway;

pub use gateway::DialogueGateway;
