//! Business logic services for the Estoque backend

pub mod audit;
pub mod auth;
pub mod company;
pub mod export;
pub mod movement;
pub mod nfe;
pub mod stock;
pub mod storage;

pub use audit::AuditService;
pub use auth::AuthService;
pub use company::CompanyService;
pub use export::ExportService;
pub use movement::MovementService;
pub use stock::StockService;
pub use storage::StorageService;
