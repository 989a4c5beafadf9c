//! Views - Turn command outcomes into replies

pub mod notices;
pub mod photo;

pub use photo::{DetailPanel, ImageCard};
