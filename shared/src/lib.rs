//! Shared types and models for the Estoque inventory management system
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system, plus the stock balance engine.

pub mod balance;
pub mod models;
pub mod types;
pub mod validation;

pub use balance::*;
pub use models::*;
pub use types::*;
pub use validation::*;
