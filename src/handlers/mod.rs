//! HTTP handlers for the core route modules.

pub mod auth;
pub mod language;
pub mod user;
