//! Application layer errors

use thiserror::Error;
use crate::domain::entities::{Camera, Rover};

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),
}

/// Errors from the photo API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    #[error("NASA API rate limit reached")]
    RateLimited,

    #[error("NASA API returned status code {status}")]
    Api { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PhotoError {
    /// Map a non-success HTTP status to its error kind
    pub fn from_status(status: u16) -> Self {
        if status == 429 {
            PhotoError::RateLimited
        } else {
            PhotoError::Api { status }
        }
    }
}

/// Rejected photo requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{camera} is not a camera on {rover}")]
    InvalidCombination { rover: Rover, camera: Camera },

    #[error("sol {sol} is outside 0-{max} for {rover}")]
    SolOutOfRange { rover: Rover, sol: i64, max: u32 },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
