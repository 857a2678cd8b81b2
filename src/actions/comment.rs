use async_trait::async_trait;
use teloxide::types::UserId;

use crate::actions::category::COMMENT_PROMPT;
use crate::actions::{ButtonAction, START_REMINDER};
use crate::error::BotError;
use crate::handlers::keyboards::comment_keyboard;
use crate::models::{CurrentOperation, EventPayload, InboundEvent, Reply};
use crate::state_store::UserStateStore;

pub const COMMENT_SAVED: &str = "Комментарий сохранён";

/// Принимает комментарий к операции.
///
/// Текстовое сообщение сохраняется как комментарий и переводит мастер в
/// `Complete`; нажатие кнопки только повторяет подсказку.
pub struct LeaveCommentAction {
    store: UserStateStore,
}

impl LeaveCommentAction {
    pub fn new(store: UserStateStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ButtonAction for LeaveCommentAction {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError> {
        let mut state = self.store.get(user_id).await.unwrap_or_default();
        let accepts_comment = state.is_waiting_for_input
            && matches!(
                state.current_operation,
                CurrentOperation::ChoosingComment | CurrentOperation::Complete
            );

        if !accepts_comment {
            return Ok(Reply::text(event.chat_id, START_REMINDER));
        }

        match &event.payload {
            EventPayload::Callback { .. } => Ok(Reply::text(event.chat_id, COMMENT_PROMPT)
                .with_keyboard(comment_keyboard())),
            EventPayload::Text(text) => {
                state.ensure_complete()?;
                state.comment = text.trim().to_string();
                state.current_operation = CurrentOperation::Complete;
                self.store.save(user_id, state).await?;

                Ok(Reply::text(event.chat_id, COMMENT_SAVED)
                    .with_keyboard(comment_keyboard()))
            }
        }
    }
}
