use std::sync::Arc;

use async_trait::async_trait;
use teloxide::types::UserId;

use crate::actions::{ButtonAction, START_REMINDER};
use crate::error::BotError;
use crate::handlers::keyboards::main_menu_keyboard;
use crate::models::{CurrentOperation, InboundEvent, InsertOperationRecord, Reply};
use crate::notion::RecordSink;
use crate::state_store::UserStateStore;

pub const SUBMIT_SUCCESS: &str = "Данные успешно отправлены";

/// Сохраняет заполненную операцию во внешнее хранилище.
///
/// При успехе состояние пользователя сбрасывается, при ошибке остаётся
/// нетронутым, чтобы сохранение можно было повторить.
pub struct SubmitAction {
    store: UserStateStore,
    sink: Arc<dyn RecordSink>,
}

impl SubmitAction {
    pub fn new(store: UserStateStore, sink: Arc<dyn RecordSink>) -> Self {
        Self { store, sink }
    }
}

#[async_trait]
impl ButtonAction for SubmitAction {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError> {
        let state = self.store.get(user_id).await.unwrap_or_default();
        if !state.is_waiting_for_input {
            return Ok(Reply::text(event.chat_id, START_REMINDER));
        }

        if !matches!(
            state.current_operation,
            CurrentOperation::ChoosingComment | CurrentOperation::Complete
        ) {
            return Err(BotError::input("операция ещё не заполнена до конца"));
        }

        let kind = state.ensure_complete()?;
        let record = InsertOperationRecord::from_state(event.display_name(), kind, &state);

        // Замок хранилища здесь не удерживается: вызов идёт по сети.
        self.sink.insert(record).await?;
        self.store.reset(user_id).await?;

        log::info!("✅ Operation submitted for user {}", user_id);

        Ok(Reply::text(event.chat_id, SUBMIT_SUCCESS).with_keyboard(main_menu_keyboard()))
    }
}
