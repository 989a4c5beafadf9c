//! Message handling - Parsing raw platform input

pub mod parser;

pub use parser::MessageParser;
