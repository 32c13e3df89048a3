//! Domain models for the Estoque inventory management system

mod company;
mod movement;
mod stock;

pub use company::*;
pub use movement::*;
pub use stock::*;
