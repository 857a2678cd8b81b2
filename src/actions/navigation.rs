use async_trait::async_trait;
use teloxide::types::UserId;

use crate::actions::ButtonAction;
use crate::error::BotError;
use crate::handlers::keyboards::main_menu_keyboard;
use crate::models::{InboundEvent, Reply, UserState};
use crate::state_store::UserStateStore;

pub const CHOOSE_ACTION: &str = "выберите действие";

/// Возврат к главному меню с отменой начатой операции.
pub struct ReturnToMainAction {
    store: UserStateStore,
}

impl ReturnToMainAction {
    pub fn new(store: UserStateStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ButtonAction for ReturnToMainAction {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError> {
        self.store.save(user_id, UserState::default()).await?;

        Ok(Reply::text(event.chat_id, CHOOSE_ACTION)
            .with_keyboard(main_menu_keyboard())
            .editing(event.message_id()))
    }
}
