//! Действия, привязанные к идентификаторам inline-кнопок.
//!
//! Реестр собирается один раз при старте и ищет действие только по точному
//! совпадению идентификатора.

pub mod category;
pub mod comment;
pub mod navigation;
pub mod start;
pub mod submit;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::types::UserId;

use crate::error::BotError;
use crate::models::{InboundEvent, Reply};
use crate::notion::RecordSink;
use crate::state_store::UserStateStore;

pub use category::{CategoryDelegate, ChooseCategoryAction};
pub use comment::LeaveCommentAction;
pub use navigation::ReturnToMainAction;
pub use start::StartOperationAction;
pub use submit::SubmitAction;

pub const BUTTON_REFILL: &str = "пополнить";
pub const BUTTON_WITHDRAWAL: &str = "снятие";
pub const BUTTON_CHOOSE_CATEGORY: &str = "выберите категорию";
pub const BUTTON_LEAVE_COMMENT: &str = "оставить комментарий";
pub const BUTTON_BACK_TO_MAIN: &str = "вернуться к стартовой странице";
pub const BUTTON_SUBMIT: &str = "сохранить запись в notion";

pub const RESERVED_BUTTONS: [&str; 6] = [
    BUTTON_REFILL,
    BUTTON_WITHDRAWAL,
    BUTTON_CHOOSE_CATEGORY,
    BUTTON_LEAVE_COMMENT,
    BUTTON_BACK_TO_MAIN,
    BUTTON_SUBMIT,
];

#[async_trait]
pub trait ButtonAction: Send + Sync {
    async fn act(&self, user_id: UserId, event: &InboundEvent) -> Result<Reply, BotError>;
}

#[derive(Clone)]
pub struct ActionRegistry {
    actions: Arc<HashMap<String, Arc<dyn ButtonAction>>>,
}

impl ActionRegistry {
    pub fn new(store: UserStateStore, sink: Arc<dyn RecordSink>, categories: Vec<String>) -> Self {
        let categories = Arc::new(categories);
        let mut actions: HashMap<String, Arc<dyn ButtonAction>> = HashMap::new();

        actions.insert(
            BUTTON_REFILL.to_string(),
            Arc::new(StartOperationAction::refill(store.clone())),
        );
        actions.insert(
            BUTTON_WITHDRAWAL.to_string(),
            Arc::new(StartOperationAction::withdrawal(store.clone())),
        );
        actions.insert(
            BUTTON_CHOOSE_CATEGORY.to_string(),
            Arc::new(ChooseCategoryAction::new(store.clone(), categories.clone())),
        );
        actions.insert(
            BUTTON_LEAVE_COMMENT.to_string(),
            Arc::new(LeaveCommentAction::new(store.clone())),
        );
        actions.insert(
            BUTTON_BACK_TO_MAIN.to_string(),
            Arc::new(ReturnToMainAction::new(store.clone())),
        );
        actions.insert(
            BUTTON_SUBMIT.to_string(),
            Arc::new(SubmitAction::new(store.clone(), sink)),
        );

        for category in categories.iter() {
            actions.insert(
                category.clone(),
                Arc::new(CategoryDelegate::new(store.clone(), category.clone())),
            );
        }

        Self {
            actions: Arc::new(actions),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn ButtonAction>> {
        self.actions.get(id).cloned()
    }

    /// Действие, которое движок вызывает сам, а не по нажатию кнопки.
    pub fn require(&self, id: &str) -> Result<Arc<dyn ButtonAction>, BotError> {
        self.get(id).ok_or_else(|| BotError::ActionNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

/// Напоминание для ввода вне мастера.
pub const START_REMINDER: &str = "все хиханьки хаханьки тебе? Жмякни по /start";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSink;

    fn registry() -> ActionRegistry {
        ActionRegistry::new(
            UserStateStore::default(),
            Arc::new(FakeSink::default()),
            vec!["продукты".to_string(), "кафе".to_string()],
        )
    }

    #[test]
    fn registers_fixed_buttons_and_categories() {
        let registry = registry();
        assert_eq!(registry.len(), RESERVED_BUTTONS.len() + 2);
        for id in RESERVED_BUTTONS {
            assert!(registry.get(id).is_some(), "missing {}", id);
        }
        assert!(registry.get("кафе").is_some());
    }

    #[test]
    fn lookup_is_exact_match() {
        let registry = registry();
        assert!(registry.get("пополн").is_none());
        assert!(registry.get("пополнить ").is_none());
        assert!(registry.get("ПОПОЛНИТЬ").is_none());
        assert!(matches!(
            registry.require("нет такой"),
            Err(BotError::ActionNotFound(_))
        ));
    }
}
