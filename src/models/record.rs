use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::models::{OperationKind, UserState};

/// Метка категории, которая всегда ставится для пополнений.
pub const REFILL_CATEGORY: &str = "пополнение";

/// Готовая запись об операции для внешнего хранилища.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOperationRecord {
    pub creator: String,
    pub category: String,
    pub amount: f64,
    pub operation: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl InsertOperationRecord {
    pub fn from_state(creator: String, kind: OperationKind, state: &UserState) -> Self {
        let category = match kind {
            OperationKind::Refill => REFILL_CATEGORY.to_string(),
            OperationKind::Withdrawal => state.category.clone().unwrap_or_default(),
        };

        Self {
            creator,
            category,
            amount: state.amount.unwrap_or_default(),
            operation: kind.label().to_string(),
            comment: state.comment.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), SinkError> {
        if self.creator.trim().is_empty() {
            return Err(SinkError::Validation("creator is empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(SinkError::Validation("category is empty".to_string()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(SinkError::Validation(format!("invalid amount: {}", self.amount)));
        }
        if OperationKind::from_label(&self.operation).is_none() {
            return Err(SinkError::Validation(format!(
                "unknown operation kind: {}",
                self.operation
            )));
        }
        Ok(())
    }
}
