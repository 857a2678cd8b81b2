//! Конечный автомат диалога: разбирает входящее событие по текущему
//! состоянию пользователя и отвечает в чат.

pub mod callbacks;
pub mod commands;
pub mod keyboards;
pub mod messages;

use std::sync::Arc;

use crate::actions::ActionRegistry;
use crate::error::BotError;
use crate::handlers::keyboards::comment_keyboard;
use crate::models::{EventPayload, InboundEvent, Reply};
use crate::state_store::UserStateStore;
use crate::telegram::Transport;

pub use commands::Command;

const UNEXPECTED_ERROR: &str =
    "произошла ошибка при обработке ваших ответов и/или внутренняя\nначните заново /start";

pub struct ConversationEngine {
    store: UserStateStore,
    actions: ActionRegistry,
    transport: Arc<dyn Transport>,
    bot_name: String,
    notion_url: Option<reqwest::Url>,
}

impl ConversationEngine {
    pub fn new(
        store: UserStateStore,
        actions: ActionRegistry,
        transport: Arc<dyn Transport>,
        bot_name: String,
        notion_url: Option<reqwest::Url>,
    ) -> Self {
        Self {
            store,
            actions,
            transport,
            bot_name,
            notion_url,
        }
    }

    pub fn store(&self) -> &UserStateStore {
        &self.store
    }

    /// Обрабатывает одно событие. Состояние пользователя к этому моменту
    /// уже создано диспетчером.
    pub async fn handle(&self, event: &InboundEvent) -> Result<(), BotError> {
        match &event.payload {
            EventPayload::Callback { query_id, data, .. } => {
                callbacks::callback_handler(self, event, query_id, data).await
            }
            EventPayload::Text(text) if text.starts_with('/') => {
                commands::command_handler(self, event, text).await
            }
            EventPayload::Text(text) => messages::message_handler(self, event, text).await,
        }
    }

    async fn reply(&self, reply: Reply) -> Result<(), BotError> {
        self.transport.send(reply).await?;
        Ok(())
    }

    /// Вызывает зарегистрированное действие и отправляет его ответ.
    async fn run_action(&self, id: &str, event: &InboundEvent) -> Result<(), BotError> {
        let action = self.actions.require(id)?;
        match action.act(event.user_id, event).await {
            Ok(reply) => self.reply(reply).await,
            Err(err) => self.report(event, err).await,
        }
    }

    /// Сообщает пользователю об ошибке и возвращает её диспетчеру для лога.
    async fn report(&self, event: &InboundEvent, err: BotError) -> Result<(), BotError> {
        let reply = match &err {
            BotError::InputValidation(message) => Reply::text(event.chat_id, message.clone()),
            BotError::Sink(sink_err) if sink_err.is_retryable() => Reply::text(
                event.chat_id,
                "не удалось сохранить запись, попробуйте ещё раз",
            )
            .with_keyboard(comment_keyboard()),
            BotError::Sink(_) => Reply::text(
                event.chat_id,
                "хранилище отклонило запись, проверьте данные или начните заново /start",
            ),
            _ => Reply::text(event.chat_id, UNEXPECTED_ERROR),
        };

        if let Err(send_err) = self.transport.send(reply).await {
            log::error!("Error sending error message to {}: {}", event.user_id, send_err);
        }
        Err(err)
    }
}
