//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Photo lookup, commands, message delivery
//! - Views: Reply formatting
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod errors;
pub mod services;
pub mod messaging;
pub mod views;
