use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::InsertOperationRecord;

pub const COLUMN_CREATOR: &str = "Создатель";
pub const COLUMN_CATEGORY: &str = "Категория";
pub const COLUMN_AMOUNT: &str = "Сумма";
pub const COLUMN_OPERATION: &str = "Операция";
pub const COLUMN_COMMENT: &str = "Комментарий";
pub const COLUMN_CREATED_AT: &str = "Дата";

#[derive(Clone, Debug, Serialize)]
pub struct CreatePageRequest {
    pub parent: Parent,
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Parent {
    pub database_id: String,
}

impl CreatePageRequest {
    pub fn from_record(database_id: &str, record: &InsertOperationRecord) -> Self {
        let mut properties = serde_json::Map::new();
        properties.insert(COLUMN_CREATOR.into(), title(&record.creator));
        properties.insert(COLUMN_CATEGORY.into(), select(&record.category));
        properties.insert(COLUMN_AMOUNT.into(), json!({ "number": record.amount }));
        properties.insert(COLUMN_OPERATION.into(), select(&record.operation));
        properties.insert(COLUMN_COMMENT.into(), rich_text(&record.comment));
        properties.insert(COLUMN_CREATED_AT.into(), date(record.created_at));

        Self {
            parent: Parent {
                database_id: database_id.to_string(),
            },
            properties,
        }
    }
}

fn title(content: &str) -> Value {
    json!({ "title": [{ "text": { "content": content } }] })
}

fn rich_text(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

fn date(at: DateTime<Utc>) -> Value {
    json!({ "date": { "start": at.to_rfc3339() } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_maps_to_database_columns() {
        let record = InsertOperationRecord {
            creator: "jaba368".into(),
            category: "продукты".into(),
            amount: 150.5,
            operation: "снятие".into(),
            comment: "groceries".into(),
            created_at: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
        };

        let body = serde_json::to_value(CreatePageRequest::from_record("db-1", &record)).unwrap();

        assert_eq!(body["parent"]["database_id"], "db-1");
        let props = &body["properties"];
        assert_eq!(props[COLUMN_CREATOR]["title"][0]["text"]["content"], "jaba368");
        assert_eq!(props[COLUMN_CATEGORY]["select"]["name"], "продукты");
        assert_eq!(props[COLUMN_AMOUNT]["number"], 150.5);
        assert_eq!(props[COLUMN_OPERATION]["select"]["name"], "снятие");
        assert_eq!(props[COLUMN_COMMENT]["rich_text"][0]["text"]["content"], "groceries");
        assert_eq!(props[COLUMN_CREATED_AT]["date"]["start"], "2025-07-01T12:00:00+00:00");
    }
}
