//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (Message, Command, Rover, PhotoRecord, Reply)
//! - Traits: Abstractions for infrastructure (Bot, PhotoSource)

pub mod entities;
pub mod traits;
