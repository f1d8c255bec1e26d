//! Core model modules: each exposes a `module()` loader contributing its table
//! definitions, plus the row types and persistence helpers for that entity.

pub mod language;
pub mod token;
pub mod user;
