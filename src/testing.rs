//! Тестовые заглушки транспорта и хранилища записей.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId, UserId};

use crate::error::{SinkError, TransportError};
use crate::models::{EventPayload, InboundEvent, InsertOperationRecord, Reply};
use crate::notion::RecordSink;
use crate::telegram::Transport;

pub fn text_event(user: u64, text: &str) -> InboundEvent {
    InboundEvent {
        user_id: UserId(user),
        chat_id: ChatId(user as i64),
        username: Some(format!("user{}", user)),
        first_name: "Тест".to_string(),
        payload: EventPayload::Text(text.to_string()),
    }
}

pub fn callback_event(user: u64, data: &str) -> InboundEvent {
    InboundEvent {
        payload: EventPayload::Callback {
            query_id: format!("q-{}-{}", user, data),
            data: data.to_string(),
            message_id: Some(MessageId(100)),
        },
        ..text_event(user, "")
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Reply>>,
    answered: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|r| r.text.clone()).collect()
    }

    pub fn last(&self) -> Option<Reply> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, reply: Reply) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(reply);
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), TransportError> {
        self.answered.lock().unwrap().push(query_id.to_string());
        Ok(())
    }
}

/// Хранилище записей в памяти; можно заставить следующий вызов упасть
/// или отвечать с задержкой.
#[derive(Default)]
pub struct FakeSink {
    records: Mutex<Vec<InsertOperationRecord>>,
    failure: Mutex<Option<SinkError>>,
    delay: Option<Duration>,
}

impl FakeSink {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, err: SinkError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn records(&self) -> Vec<InsertOperationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for FakeSink {
    async fn insert(&self, record: InsertOperationRecord) -> Result<(), SinkError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.failure.lock().unwrap().take() {
            return Err(err);
        }
        record.validate()?;
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
