//! Application services - Business logic orchestration

pub mod command_service;
pub mod detail_panels;
pub mod message_service;
pub mod photo_service;
pub mod rate_limit;
pub mod sol_cache;

pub use command_service::{CommandService, Response};
pub use detail_panels::DetailPanels;
pub use message_service::MessageService;
pub use photo_service::{CommandOutcome, PhotoRequest, PhotoService};
pub use rate_limit::RateLimitGuard;
pub use sol_cache::SolCache;
