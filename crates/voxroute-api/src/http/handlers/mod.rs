//! HTTP request handlers.

pub mod chat;
pub mod home;
pub mod session;
