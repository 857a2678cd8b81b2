use async_trait::async_trait;
use teloxide::types::UserId;

use crate::actions::ButtonAction;
use crate::error::BotError;
use crate::handlers::keyboards::back_keyboard;
use crate::models::{InboundEvent, OperationKind, Reply, UserState};
use crate::state_store::UserStateStore;

/// «пополнить» / «снятие»: начинает мастер заново и ждёт сумму.
pub struct StartOperationAction {
    store: UserStateStore,
    kind: OperationKind,
}

impl StartOperationAction {
    pub fn refill(store: UserStateStore) -> Self {
        Self {
            store,
            kind: OperationKind::Refill,
        }
    }

    pub fn withdrawal(store: UserStateStore) -> Self {
        Self {
            store,
            kind: OperationKind::Withdrawal,
        }
    }
}

#[async_trait]
impl ButtonAction for StartOperationAction {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError> {
        self.store.save(user_id, UserState::started(self.kind)).await?;
        log::info!("➕ User {} started {} operation", user_id, self.kind.label());

        let prompt = match self.kind {
            OperationKind::Refill => "Введите сумму операции",
            OperationKind::Withdrawal => "Введите сумму",
        };

        Ok(Reply::text(event.chat_id, prompt)
            .with_keyboard(back_keyboard())
            .editing(event.message_id()))
    }
}
