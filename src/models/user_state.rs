use crate::error::BotError;

/// Позиция пользователя в мастере заполнения операции.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentOperation {
    #[default]
    NotStarted,
    SettingSum,
    ChoosingCategory,
    ChoosingComment,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Refill,
    Withdrawal,
}

impl OperationKind {
    pub const REFILL_LABEL: &'static str = "пополнить";
    pub const WITHDRAWAL_LABEL: &'static str = "снятие";

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Refill => Self::REFILL_LABEL,
            OperationKind::Withdrawal => Self::WITHDRAWAL_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            Self::REFILL_LABEL => Some(OperationKind::Refill),
            Self::WITHDRAWAL_LABEL => Some(OperationKind::Withdrawal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserState {
    pub current_operation: CurrentOperation,
    pub is_waiting_for_input: bool,
    pub operation_kind: Option<OperationKind>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub comment: String,
}

impl UserState {
    /// Свежее состояние мастера для выбранного типа операции.
    pub fn started(kind: OperationKind) -> Self {
        Self {
            current_operation: CurrentOperation::SettingSum,
            is_waiting_for_input: true,
            operation_kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Проверяет, что для типа операции заполнены все обязательные поля.
    pub fn ensure_complete(&self) -> Result<OperationKind, BotError> {
        let kind = self
            .operation_kind
            .ok_or_else(|| BotError::input("не выбран тип операции"))?;

        match self.amount {
            Some(amount) if amount >= 0.0 => {}
            Some(_) => return Err(BotError::input("сумма должна быть положительным числом")),
            None => return Err(BotError::input("не указана сумма")),
        }

        if kind == OperationKind::Withdrawal
            && self.category.as_deref().map_or(true, str::is_empty)
        {
            return Err(BotError::input("не выбрана категория"));
        }

        Ok(kind)
    }
}
