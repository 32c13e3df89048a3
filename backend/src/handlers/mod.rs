//! HTTP request handlers

pub mod auth;
pub mod company;
pub mod export;
pub mod health;
pub mod movement;
pub mod nfe;
pub mod stock;
pub mod upload;

pub use auth::*;
pub use company::*;
pub use export::*;
pub use health::*;
pub use movement::*;
pub use nfe::*;
pub use stock::*;
pub use upload::*;
