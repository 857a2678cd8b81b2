pub mod page;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::error::SinkError;
use crate::models::InsertOperationRecord;
use crate::notion::page::CreatePageRequest;

const RETRIES: u32 = 1;
const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Внешнее хранилище готовых записей.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert(&self, record: InsertOperationRecord) -> Result<(), SinkError>;
}

pub struct NotionSink {
    client: ClientWithMiddleware,
    api_base: String,
    secret: String,
    database_id: String,
}

impl NotionSink {
    /// `timeout` ограничивает каждую попытку запроса: зависший Notion
    /// превращается в повторяемую ошибку, а не в заблокированного воркера.
    pub fn new(
        secret: String,
        database_id: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRIES);

        let http = Client::builder().timeout(timeout).build()?;
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_base: NOTION_API.to_string(),
            secret,
            database_id,
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl RecordSink for NotionSink {
    async fn insert(&self, record: InsertOperationRecord) -> Result<(), SinkError> {
        record.validate()?;

        let request = CreatePageRequest::from_record(&self.database_id, &record);
        let body = serde_json::to_vec(&request)
            .map_err(|e| SinkError::Validation(e.to_string()))?;

        let response = self
            .client
            .post(format!("{}/pages", self.api_base))
            .bearer_auth(&self.secret)
            .header("Notion-Version", NOTION_VERSION)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::info!("📝 Notion page created for {}", record.creator);
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        log::error!("Notion rejected page ({}): {}", status, text);
        Err(classify(status, text))
    }
}

/// 4xx, кроме 429, означает ошибку в самой записи; остальное можно повторить.
fn classify(status: StatusCode, text: String) -> SinkError {
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        SinkError::Validation(format!("{}: {}", status, text))
    } else {
        SinkError::Transport(format!("{}: {}", status, text))
    }
}
