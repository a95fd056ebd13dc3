//! Routing logic and port trait definitions for voxroute.
//!
//! This crate defines the "ports" (dialogue gateway and chat log repository
//! traits) that the infrastructure layer implements, plus the pure pieces of
//! the request pipeline: lemmatization and agent classification. It depends
//! only on `voxroute-types` -- never on `voxroute-infra` or any network or
//! database crate.

pub mod chat;
pub mod classify;
pub mod dialogue;
pub mod nlp;
