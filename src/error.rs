use teloxide::types::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("user state not found: {0}")]
    NotFound(UserId),
}

/// Ошибки внешнего хранилища записей.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Запись некорректна; повтор без исправления ввода не поможет.
    #[error("record rejected: {0}")]
    Validation(String),
    /// Сеть или сервер; можно повторить сохранение.
    #[error("record store unavailable: {0}")]
    Transport(String),
}

impl SinkError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("invalid input: {0}")]
    InputValidation(String),
    #[error("state not found for user {0}")]
    StateNotFound(UserId),
    #[error("no action registered for {0:?}")]
    ActionNotFound(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl BotError {
    pub fn input(message: impl Into<String>) -> Self {
        BotError::InputValidation(message.into())
    }

    /// Ожидаемые ошибки пользовательского ввода, а не сбои бота.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            BotError::InputValidation(_) | BotError::UnknownCommand(_) | BotError::ActionNotFound(_)
        )
    }
}

impl From<StateError> for BotError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotFound(user_id) => BotError::StateNotFound(user_id),
        }
    }
}
