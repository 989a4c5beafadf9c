//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{self, Command};
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};
use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl User {
    fn to_entity(&self) -> entities::User {
        entities::User::new(self.id.to_string())
            .with_username(self.username.clone())
            .with_first_name(self.first_name.clone())
    }
}

impl Update {
    /// Convert into a domain message; updates without text or callback data are skipped
    pub fn into_message(self, parser: &MessageParser) -> Option<entities::Message> {
        if let Some(msg) = self.message {
            let text = msg.text.filter(|t| !t.trim().is_empty())?;
            let sender = msg.from.as_ref().map(User::to_entity);
            return Some(parser.parse(msg.chat.id.to_string(), text, sender).with_platform("telegram"));
        }

        let cb = self.callback_query?;
        // Buttons on very old messages arrive without the message
        let chat_id = cb.message.as_ref().map(|m| m.chat.id).unwrap_or(cb.from.id);
        Some(
            parser
                .parse_callback(chat_id.to_string(), cb.id, cb.data.unwrap_or_default(), cb.from.to_entity())
                .with_platform("telegram"),
        )
    }
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

fn inline_keyboard(buttons: Vec<Vec<KeyboardButton>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: buttons.into_iter().map(|row| {
            row.into_iter().map(|btn| InlineKeyboardButton {
                text: btn.text,
                callback_data: btn.callback_data,
                url: btn.url,
            }).collect()
        }).collect(),
    }
}

#[derive(Deserialize)]
struct MessageResponse {
    result: MessageResult,
}

#[derive(Deserialize)]
struct MessageResult {
    message_id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "mars-bot".to_string(),
                username: "mars_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// POST a Telegram method and fail on non-success status
    async fn call<T: Serialize + ?Sized>(&self, method: &str, request: &T) -> Result<reqwest::Response, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Telegram API error {} on {}: {}", status, method, body)));
        }
        Ok(response)
    }

    async fn call_for_message_id<T: Serialize + ?Sized>(&self, method: &str, request: &T) -> Result<String, BotError> {
        let data: MessageResponse = self.call(method, request)
            .await?
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: BotInfoResponse,
        }

        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };

        self.call("getUpdates", &request)
            .await?
            .json::<Response>()
            .await
            .map(|data| data.result)
            .map_err(|e| BotError::Parse(e.to_string()))
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
    }

    /// Send a message via Telegram API - try Markdown, fallback to plain
    pub async fn send_message_api(&self, chat_id: &str, text: &str, buttons: Vec<Vec<KeyboardButton>>) -> Result<String, BotError> {
        match self.send_message_with_format(chat_id, text, Some("Markdown"), &buttons).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("Markdown failed, using plain text: {}", e);
                self.send_message_with_format(chat_id, text, None, &buttons).await
            }
        }
    }

    /// Send a message with specific parse mode
    pub async fn send_message_with_format(&self, chat_id: &str, text: &str, parse_mode: Option<&str>, buttons: &[Vec<KeyboardButton>]) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            reply_markup: (!buttons.is_empty()).then(|| inline_keyboard(buttons.to_vec())),
        };

        self.call_for_message_id("sendMessage", &request).await
    }

    /// Register bot commands with Telegram
    pub async fn register_commands<'a>(&self, commands: impl Iterator<Item = &'a Command>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct BotCommand {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<BotCommand>,
        }

        let commands = commands
            .map(|cmd| BotCommand {
                command: cmd.name.clone(),
                description: cmd.description.clone().unwrap_or_else(|| cmd.name.clone()),
            })
            .collect();

        self.call("setMyCommands", &SetMyCommandsRequest { commands }).await?;

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }

    /// Send chat action (typing, upload_photo, etc.)
    pub async fn send_chat_action(&self, chat_id: &str, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest<'a> {
            chat_id: &'a str,
            action: &'a str,
        }

        self.call("sendChatAction", &SendChatActionRequest { chat_id, action }).await?;
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", &self.token[..8.min(self.token.len())]);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);
        self.send_message_api(chat_id, text, Vec::new()).await
    }

    async fn send_with_keyboard(&self, chat_id: &str, text: &str, buttons: Vec<Vec<KeyboardButton>>) -> Result<String, BotError> {
        tracing::debug!("Sending with keyboard to {}: {}", chat_id, text);
        self.send_message_api(chat_id, text, buttons).await
    }

    async fn send_photo(&self, chat_id: &str, photo_url: &str, caption: &str, buttons: Vec<Vec<KeyboardButton>>) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendPhotoRequest<'a> {
            chat_id: &'a str,
            photo: &'a str,
            caption: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        tracing::debug!("Sending photo to {}: {}", chat_id, photo_url);
        let _ = self.send_chat_action(chat_id, "upload_photo").await;

        let request = SendPhotoRequest {
            chat_id,
            photo: photo_url,
            caption,
            reply_markup: (!buttons.is_empty()).then(|| inline_keyboard(buttons)),
        };

        self.call_for_message_id("sendPhoto", &request).await
    }

    async fn clear_keyboard(&self, chat_id: &str, message_id: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct EditReplyMarkupRequest<'a> {
            chat_id: &'a str,
            message_id: i64,
            reply_markup: InlineKeyboardMarkup,
        }

        let message_id = message_id
            .parse()
            .map_err(|_| BotError::Parse(format!("Invalid message id: {}", message_id)))?;

        let request = EditReplyMarkupRequest {
            chat_id,
            message_id,
            reply_markup: InlineKeyboardMarkup { inline_keyboard: Vec::new() },
        };

        self.call("editMessageReplyMarkup", &request).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
        }

        self.call("answerCallbackQuery", &AnswerRequest { callback_query_id: callback_id, text }).await?;
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
    fn test_command_update_to_message() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 10,
            "message": {
                "message_id": 3,
                "from": {"id": 77, "username": "astro", "first_name": "Ann"},
                "chat": {"id": -1001},
                "text": "/mars@mars_bot curiosity mast 200"
            }
        })).expect("valid update");

        let msg = update.into_message(&MessageParser::new("/")).expect("message");
        assert_eq!(msg.chat_id, "-1001");
        assert_eq!(msg.sender_id(), Some("77"));
        assert_eq!(msg.platform, "telegram");
        assert!(matches!(msg.content, Content::Command { ref name, ref args } if name == "mars" && args.len() == 3));
    }

    #[test]
    fn test_callback_update_to_message() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 11,
            "callback_query": {
                "id": "cbq-1",
                "from": {"id": 77},
                "message": {"message_id": 4, "chat": {"id": -1001}},
                "data": "info:abc"
            }
        })).expect("valid update");

        let msg = update.into_message(&MessageParser::new("/")).expect("message");
        assert_eq!(msg.chat_id, "-1001");
        assert_eq!(
            msg.content,
            Content::Callback { query_id: "cbq-1".to_string(), data: "info:abc".to_string() }
        );
    }

    #[test]
    fn test_update_without_text_is_skipped() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 12,
            "message": {"message_id": 5, "chat": {"id": 1}}
        })).expect("valid update");
        assert!(update.into_message(&MessageParser::new("/")).is_none());
    }

    #[test]
    fn test_next_offset() {
        let updates: Vec<Update> = serde_json::from_value(serde_json::json!([
            {"update_id": 5}, {"update_id": 9}, {"update_id": 7}
        ])).expect("valid updates");
        assert_eq!(TelegramAdapter::get_next_offset(&updates), Some(10));
        assert_eq!(TelegramAdapter::get_next_offset(&[]), None);
    }

    #[test]
    fn test_inline_keyboard_serialization() {
        let markup = inline_keyboard(vec![vec![KeyboardButton::new("More info").with_callback("info:1")]]);
        let json = serde_json::to_value(&markup).expect("serializable");
        assert_eq!(json, serde_json::json!({
            "inline_keyboard": [[{"text": "More info", "callback_data": "info:1"}]]
        }));
    }
}
