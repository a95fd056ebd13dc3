//! Chat turn handling and chat log persistence abstractions.
//!
//! `ChatLogRepository` is the append-only audit store port; `ChatService`
//! orchestrates one turn: classify, ask the dialogue backend, persist, reply.

pub mod repository;
pub mod service;
pub mod session;
