//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};
use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;

pub const CONSOLE_CHAT: &str = "console";
const CONSOLE_USER: &str = "console-user";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    next_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "mars-bot".to_string(),
                username: "console".to_string(),
            },
            next_id: AtomicU64::new(1),
        }
    }

    fn next_message_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    fn print_buttons(buttons: &[Vec<KeyboardButton>]) {
        for row in buttons {
            let row_text: Vec<String> = row.iter()
                .map(|b| match &b.callback_data {
                    Some(data) => format!("{} (press {})", b.text, data),
                    None => b.text.clone(),
                })
                .collect();
            println!("  [Buttons] {}", row_text.join(" | "));
        }
    }

    /// Turn a typed line into a message; `press <data>` simulates a button
    pub fn to_message(parser: &MessageParser, line: &str) -> Option<Message> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let user = User::new(CONSOLE_USER).with_username(Some("console"));
        let message = match line.strip_prefix("press ") {
            Some(data) => parser.parse_callback(CONSOLE_CHAT, "console-press", data.trim(), user),
            None => parser.parse(CONSOLE_CHAT, line, Some(user)),
        };
        Some(message.with_platform("console"))
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT -> {}] {}", chat_id, text);
        Ok(self.next_message_id())
    }

    async fn send_with_keyboard(&self, chat_id: &str, text: &str, buttons: Vec<Vec<KeyboardButton>>) -> Result<String, BotError> {
        println!("[BOT -> {}] {}", chat_id, text);
        Self::print_buttons(&buttons);
        Ok(self.next_message_id())
    }

    async fn send_photo(&self, chat_id: &str, photo_url: &str, caption: &str, buttons: Vec<Vec<KeyboardButton>>) -> Result<String, BotError> {
        println!("[BOT -> {}] {}\n  [Photo] {}", chat_id, caption, photo_url);
        Self::print_buttons(&buttons);
        Ok(self.next_message_id())
    }

    async fn clear_keyboard(&self, _chat_id: &str, message_id: &str) -> Result<(), BotError> {
        println!("  [Buttons removed from message {}]", message_id);
        Ok(())
    }

    async fn answer_callback(&self, _callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        if let Some(text) = text {
            println!("  [Notice] {}", text);
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Content;

    #[test]
    fn test_press_simulates_callback() {
        let parser = MessageParser::new("/");
        let msg = ConsoleAdapter::to_message(&parser, "press info:abc").expect("message");
        assert!(matches!(msg.content, Content::Callback { ref data, .. } if data == "info:abc"));

        let msg = ConsoleAdapter::to_message(&parser, "/mars spirit navcam 2").expect("message");
        assert!(matches!(msg.content, Content::Command { ref name, .. } if name == "mars"));
        assert_eq!(msg.sender_id(), Some(CONSOLE_USER));
        assert!(ConsoleAdapter::to_message(&parser, "   ").is_none());
    }

    #[tokio::test]
    async fn test_message_ids_are_distinct() {
        let bot = ConsoleAdapter::new();
        let a = bot.send_message(CONSOLE_CHAT, "one").await.expect("sent");
        let b = bot.send_photo(CONSOLE_CHAT, "https://mars.example/p.jpg", "two", vec![]).await.expect("sent");
        assert_ne!(a, b);
    }
}
