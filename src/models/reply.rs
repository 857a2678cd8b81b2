use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};

/// Исходящее сообщение: текст, необязательная inline-клавиатура и,
/// для экранов по нажатию кнопки, id сообщения, которое нужно заменить.
#[derive(Debug, Clone)]
pub struct Reply {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    pub edit: Option<MessageId>,
}

impl Reply {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
            edit: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Заменить сообщение с кнопками вместо отправки нового.
    pub fn editing(mut self, message_id: Option<MessageId>) -> Self {
        self.edit = message_id;
        self
    }
}
