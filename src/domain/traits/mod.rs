//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod photo_source;

pub use bot::{Bot, BotInfo, KeyboardButton};
pub use photo_source::PhotoSource;
