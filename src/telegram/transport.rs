use async_trait::async_trait;
use teloxide::prelude::*;

use crate::error::TransportError;
use crate::models::Reply;

/// Отправка исходящих сообщений в чат.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, reply: Reply) -> Result<(), TransportError>;

    /// Подтверждение нажатия inline-кнопки.
    async fn answer_callback(&self, query_id: &str) -> Result<(), TransportError>;
}

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, reply: Reply) -> Result<(), TransportError> {
        match reply.edit {
            Some(message_id) => {
                let request = self.bot.edit_message_text(reply.chat_id, message_id, reply.text);
                match reply.keyboard {
                    Some(keyboard) => request.reply_markup(keyboard).await?,
                    None => request.await?,
                };
            }
            None => {
                let request = self.bot.send_message(reply.chat_id, reply.text);
                match reply.keyboard {
                    Some(keyboard) => request.reply_markup(keyboard).await?,
                    None => request.await?,
                };
            }
        }
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), TransportError> {
        self.bot.answer_callback_query(query_id.to_string()).await?;
        Ok(())
    }
}
