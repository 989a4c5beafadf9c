//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, Content, MessageType, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Only accept `/name@username` commands addressed to this username
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        // Check if it's a command
        if text.starts_with('/') || text.starts_with(&self.command_prefix) {
            return self.parse_command(chat_id, text, sender);
        }

        // Regular text message
        Message::new(chat_id, Content::Text(text))
            .with_message_type(MessageType::Text)
            .with_sender_opt(sender)
    }

    /// Parse a command message
    fn parse_command(&self, chat_id: String, text: String, sender: Option<User>) -> Message {
        // Remove the command prefix (either / or custom prefix)
        let cmd_text = if text.starts_with('/') {
            text.trim_start_matches('/')
        } else {
            text.trim_start_matches(&self.command_prefix)
        };

        // Split command and arguments
        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or("");

        // Group chats address commands as /name@botname
        let (name, mention) = match name.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (name, None),
        };
        if let (Some(mention), Some(ours)) = (mention, self.bot_username.as_deref()) {
            if !mention.eq_ignore_ascii_case(ours) {
                return Message::new(chat_id, Content::Text(text.clone()))
                    .with_message_type(MessageType::Text)
                    .with_sender_opt(sender);
            }
        }

        let name = name.to_string();
        let args = parts.map(|s| s.to_string()).collect();

        Message::new(chat_id, Content::Command { name, args })
            .with_message_type(MessageType::Command)
            .with_sender_opt(sender)
    }

    /// Parse a callback query (inline button press)
    pub fn parse_callback(&self, chat_id: impl Into<String>, query_id: impl Into<String>, data: impl Into<String>, user: User) -> Message {
        Message::new(chat_id, Content::Callback { query_id: query_id.into(), data: data.into() })
            .with_message_type(MessageType::Callback)
            .with_sender(user)
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    /// Helper for MessageType
    pub fn with_message_type(mut self, mt: MessageType) -> Self {
        self.message_type = mt;
        self
    }
}
