use teloxide::types::{ChatId, MessageId, Update, UpdateKind, User, UserId};

/// Входящее событие чата, уже отвязанное от формата Telegram.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub first_name: String,
    pub payload: EventPayload,
}

#[derive(Debug, Clone)]
pub enum EventPayload {
    Text(String),
    Callback {
        query_id: String,
        data: String,
        message_id: Option<MessageId>,
    },
}

impl InboundEvent {
    /// Текстовые сообщения и нажатия кнопок; остальные обновления отбрасываются.
    pub fn from_update(update: Update) -> Option<Self> {
        match update.kind {
            UpdateKind::Message(msg) => {
                let text = msg.text()?.to_string();
                let user = msg.from.as_ref()?;
                Some(Self::new(user, msg.chat.id, EventPayload::Text(text)))
            }
            UpdateKind::CallbackQuery(q) => {
                let data = q.data.clone()?;
                let (chat_id, message_id) = match &q.message {
                    Some(message) => (message.chat().id, Some(message.id())),
                    None => (ChatId::from(q.from.id), None),
                };
                Some(Self::new(
                    &q.from,
                    chat_id,
                    EventPayload::Callback {
                        query_id: q.id.clone(),
                        data,
                        message_id,
                    },
                ))
            }
            _ => None,
        }
    }

    fn new(user: &User, chat_id: ChatId, payload: EventPayload) -> Self {
        Self {
            user_id: user.id,
            chat_id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            payload,
        }
    }

    pub fn message_id(&self) -> Option<MessageId> {
        match &self.payload {
            EventPayload::Callback { message_id, .. } => *message_id,
            EventPayload::Text(_) => None,
        }
    }

    /// Имя автора записи: username, затем имя, затем числовой id.
    pub fn display_name(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if !self.first_name.trim().is_empty() => self.first_name.trim().to_string(),
            _ => self.user_id.0.to_string(),
        }
    }
}
