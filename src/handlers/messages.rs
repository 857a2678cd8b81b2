use crate::actions::category::COMMENT_PROMPT;
use crate::actions::{BUTTON_CHOOSE_CATEGORY, BUTTON_LEAVE_COMMENT, BUTTON_SUBMIT, START_REMINDER};
use crate::error::BotError;
use crate::handlers::keyboards::comment_keyboard;
use crate::handlers::ConversationEngine;
use crate::models::{CurrentOperation, InboundEvent, OperationKind, Reply, UserState};

const AMOUNT_FORMAT_ERROR: &str = "не удалось прочесть сумму, пожалуйста введите в формате 0.321";
const NEGATIVE_AMOUNT_ERROR: &str = "сумма должна быть положительным числом";

pub async fn message_handler(
    engine: &ConversationEngine,
    event: &InboundEvent,
    text: &str,
) -> Result<(), BotError> {
    let state = engine.store.get(event.user_id).await.unwrap_or_default();

    if !state.is_waiting_for_input {
        log::info!("Message from user {} is not a command: {:?}", event.user_id, text);
        return engine.reply(Reply::text(event.chat_id, START_REMINDER)).await;
    }

    log::info!("Got expected input from user {}: {:?}", event.user_id, text);

    match state.current_operation {
        CurrentOperation::SettingSum => handle_amount(engine, event, state, text).await,
        CurrentOperation::ChoosingCategory => engine.run_action(BUTTON_CHOOSE_CATEGORY, event).await,
        CurrentOperation::ChoosingComment | CurrentOperation::Complete => {
            let leave_comment = engine.actions.require(BUTTON_LEAVE_COMMENT)?;
            match leave_comment.act(event.user_id, event).await {
                Ok(reply) => engine.reply(reply).await?,
                Err(err) => return engine.report(event, err).await,
            }
            engine.run_action(BUTTON_SUBMIT, event).await
        }
        CurrentOperation::NotStarted => engine.reply(Reply::text(event.chat_id, START_REMINDER)).await,
    }
}

async fn handle_amount(
    engine: &ConversationEngine,
    event: &InboundEvent,
    mut state: UserState,
    text: &str,
) -> Result<(), BotError> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            log::warn!("User {} entered invalid sum {:?}: {}", event.user_id, text, err);
            engine.store.save(event.user_id, UserState::default()).await?;
            return engine.report(event, err).await;
        }
    };

    state.amount = Some(amount);

    match state.operation_kind {
        Some(OperationKind::Refill) => {
            state.current_operation = CurrentOperation::ChoosingComment;
            engine.store.save(event.user_id, state).await?;
            engine
                .reply(Reply::text(event.chat_id, COMMENT_PROMPT).with_keyboard(comment_keyboard()))
                .await
        }
        Some(OperationKind::Withdrawal) => {
            state.current_operation = CurrentOperation::ChoosingCategory;
            engine.store.save(event.user_id, state).await?;
            engine.run_action(BUTTON_CHOOSE_CATEGORY, event).await
        }
        None => {
            engine.store.save(event.user_id, UserState::default()).await?;
            engine
                .report(event, BotError::input("не выбран тип операции, начните заново /start"))
                .await
        }
    }
}

/// Сумма операции: число с точкой, не меньше нуля.
pub fn parse_amount(text: &str) -> Result<f64, BotError> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| BotError::input(AMOUNT_FORMAT_ERROR))?;

    if !amount.is_finite() {
        return Err(BotError::input(AMOUNT_FORMAT_ERROR));
    }
    if amount < 0.0 {
        return Err(BotError::input(NEGATIVE_AMOUNT_ERROR));
    }
    if amount == 0.0 {
        return Ok(0.0);
    }
    Ok(amount)
}
