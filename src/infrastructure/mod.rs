//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Nasa: Mars Rover Photos API client
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod nasa;
pub mod adapters;
