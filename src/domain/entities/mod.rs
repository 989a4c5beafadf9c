//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod rover;
pub mod photo;
pub mod reply;

pub use user::User;
pub use message::{Message, MessageType, Content};
pub use command::{Command, CommandRegistry};
pub use rover::{Rover, Camera};
pub use photo::{PhotoRecord, PhotoOutcome};
pub use reply::{Reply, ReplyBody, Visibility};
