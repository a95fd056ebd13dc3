//! Infrastructure layer for voxroute.
//!
//! Contains implementations of the ports defined in `voxroute-core`: the
//! SQLite chat log store, the Dialogflow dialogue gateway, and the
//! configuration file loader.

pub mod config;
pub mod dialogflow;
pub mod sqlite;
