use std::sync::Arc;

use async_trait::async_trait;
use teloxide::types::UserId;

use crate::actions::{ButtonAction, START_REMINDER};
use crate::error::BotError;
use crate::handlers::keyboards::{categories_keyboard, comment_keyboard};
use crate::models::{CurrentOperation, InboundEvent, Reply};
use crate::state_store::UserStateStore;

pub const COMMENT_PROMPT: &str = "отправьте отдельным сообщением комментарий";

/// Показывает список категорий для снятия.
pub struct ChooseCategoryAction {
    store: UserStateStore,
    categories: Arc<Vec<String>>,
}

impl ChooseCategoryAction {
    pub fn new(store: UserStateStore, categories: Arc<Vec<String>>) -> Self {
        Self { store, categories }
    }
}

#[async_trait]
impl ButtonAction for ChooseCategoryAction {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError> {
        let state = self.store.get(user_id).await.unwrap_or_default();
        if state.current_operation != CurrentOperation::ChoosingCategory {
            return Ok(Reply::text(event.chat_id, START_REMINDER));
        }

        Ok(Reply::text(event.chat_id, "Выберите категорию")
            .with_keyboard(categories_keyboard(&self.categories)))
    }
}

/// Кнопка конкретной категории: фиксирует выбор и просит комментарий.
pub struct CategoryDelegate {
    store: UserStateStore,
    category: String,
}

impl CategoryDelegate {
    pub fn new(store: UserStateStore, category: String) -> Self {
        Self { store, category }
    }
}

#[async_trait]
impl ButtonAction for CategoryDelegate {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError> {
        let mut state = self.store.get(user_id).await.unwrap_or_default();
        if state.current_operation != CurrentOperation::ChoosingCategory {
            log::debug!("Stale category button {:?} from user {}", self.category, user_id);
            return Ok(Reply::text(event.chat_id, START_REMINDER));
        }

        state.category = Some(self.category.clone());
        state.current_operation = CurrentOperation::ChoosingComment;
        state.is_waiting_for_input = true;
        self.store.save(user_id, state).await?;

        Ok(Reply::text(event.chat_id, COMMENT_PROMPT)
            .with_keyboard(comment_keyboard())
            .editing(event.message_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperationKind, UserState};
    use crate::testing::callback_event;

    async fn choosing_category(store: &UserStateStore, user: u64) {
        let mut state = UserState::started(OperationKind::Withdrawal);
        state.amount = Some(12.0);
        state.current_operation = CurrentOperation::ChoosingCategory;
        store.save(UserId(user), state).await.unwrap();
    }

    #[tokio::test]
    async fn category_press_commits_label() {
        let store = UserStateStore::default();
        choosing_category(&store, 4).await;
        let event = callback_event(4, "продукты");

        let reply = CategoryDelegate::new(store.clone(), "продукты".into())
            .act(event.user_id, &event)
            .await
            .unwrap();
        assert_eq!(reply.text, COMMENT_PROMPT);

        let state = store.get(event.user_id).await.unwrap();
        assert_eq!(state.category.as_deref(), Some("продукты"));
        assert_eq!(state.current_operation, CurrentOperation::ChoosingComment);
        assert!(state.is_waiting_for_input);
    }

    #[tokio::test]
    async fn stale_category_press_is_ignored() {
        let store = UserStateStore::default();
        let event = callback_event(5, "продукты");
        store.save(event.user_id, UserState::default()).await.unwrap();

        let reply = CategoryDelegate::new(store.clone(), "продукты".into())
            .act(event.user_id, &event)
            .await
            .unwrap();
        assert_eq!(reply.text, START_REMINDER);
        assert!(store.get(event.user_id).await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn choose_category_lists_configured_categories() {
        let store = UserStateStore::default();
        choosing_category(&store, 6).await;
        let event = callback_event(6, "выберите категорию");
        let categories = Arc::new(vec!["кафе".to_string()]);

        let reply = ChooseCategoryAction::new(store, categories)
            .act(event.user_id, &event)
            .await
            .unwrap();
        assert_eq!(reply.text, "Выберите категорию");
        assert_eq!(reply.keyboard.unwrap().inline_keyboard.len(), 2);
    }
}
