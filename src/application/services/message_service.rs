use crate::domain::entities::{Content, Message, Reply, ReplyBody};
use crate::domain::traits::{Bot, PhotoSource};
use crate::application::errors::{BotError, PhotoError};
use crate::application::views::{notices, photo::INFO_CALLBACK_PREFIX};
use super::command_service::{CommandService, Response};
use super::detail_panels::DetailPanels;

/// Service for processing messages and delivering replies
pub struct MessageService<B: Bot, S: PhotoSource> {
    bot: B,
    commands: CommandService<S>,
    panels: DetailPanels,
}

impl<B: Bot, S: PhotoSource> MessageService<B, S> {
    pub fn new(bot: B, commands: CommandService<S>, panels: DetailPanels) -> Self {
        Self { bot, commands, panels }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn commands(&self) -> &CommandService<S> {
        &self.commands
    }

    /// Process an incoming message and send whatever it produces
    pub async fn process(&self, message: Message) -> Result<(), BotError> {
        tracing::debug!("Processing {} {:?} message {}: {:?}", message.platform, message.message_type, message.id, message.content);

        match &message.content {
            Content::Command { name, .. } => {
                tracing::info!("Command /{} from {}", name, message.sender.as_ref().map(|u| u.display_name()).unwrap_or_default());
                match self.commands.handle(&message).await {
                    Ok(Some(Response::Reply(reply))) => {
                        self.deliver(&message, reply).await?;
                    }
                    Ok(Some(Response::Photo { card, details })) => {
                        let token = self.panels.open(details, &message.chat_id);
                        match self.deliver(&message, card.into_reply(&token)).await {
                            Ok(message_id) => self.panels.attach_message(&token, message_id),
                            Err(e) => {
                                tracing::warn!("Failed to send photo card to {}: {}", message.chat_id, e);
                                let failure = PhotoError::Network(e.to_string());
                                self.deliver(&message, notices::fetch_failed(&failure)).await?;
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        self.deliver(&message, Reply::text(format!("Error: {}", e)).ephemeral()).await?;
                    }
                }
            }
            Content::Callback { query_id, data } => {
                self.handle_callback(&message, query_id, data).await?;
            }
            Content::Text(_) | Content::Empty => {}
        }
        Ok(())
    }

    async fn handle_callback(&self, message: &Message, query_id: &str, data: &str) -> Result<(), BotError> {
        let Some(token) = data.strip_prefix(INFO_CALLBACK_PREFIX) else {
            tracing::debug!("Ignoring callback: {}", data);
            return self.bot.answer_callback(query_id, None).await;
        };

        match self.panels.show(token) {
            Some(panel) => {
                self.bot.answer_callback(query_id, None).await?;
                self.deliver(message, Reply::text(panel.render()).ephemeral()).await?;
            }
            None => {
                self.bot.answer_callback(query_id, Some(notices::PANEL_EXPIRED)).await?;
            }
        }
        Ok(())
    }

    /// Send a reply; ephemeral replies go to the sender's private chat when possible
    pub async fn deliver(&self, message: &Message, reply: Reply) -> Result<String, BotError> {
        if reply.is_ephemeral() {
            if let Some(user_id) = message.sender_id().filter(|id| *id != message.chat_id) {
                match self.send(user_id, &reply).await {
                    Ok(id) => return Ok(id),
                    Err(e) => {
                        tracing::warn!("Private reply to {} failed, using chat {}: {}", user_id, message.chat_id, e);
                    }
                }
            }
        }
        self.send(&message.chat_id, &reply).await
    }

    async fn send(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        tracing::info!("Sending response to chat_id {}: {}", chat_id, reply.text_content().lines().next().unwrap_or_default());
        match &reply.body {
            ReplyBody::Photo { url, caption } => {
                self.bot.send_photo(chat_id, url, caption, reply.buttons.clone()).await
            }
            ReplyBody::Text(text) if reply.buttons.is_empty() => self.bot.send_message(chat_id, text).await,
            ReplyBody::Text(text) => self.bot.send_with_keyboard(chat_id, text, reply.buttons.clone()).await,
        }
    }

    /// Take the button off image messages whose panel has expired
    pub async fn expire_panels(&self) -> usize {
        let expired = self.panels.sweep_expired();
        for panel in &expired {
            if let Err(e) = self.bot.clear_keyboard(&panel.chat_id, &panel.message_id).await {
                tracing::warn!("Failed to remove button from {}/{}: {}", panel.chat_id, panel.message_id, e);
            }
        }
        expired.len()
    }
}
