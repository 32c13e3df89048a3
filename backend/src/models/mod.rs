//! Database models for the Estoque backend
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
