use crate::error::BotError;
use crate::handlers::ConversationEngine;
use crate::models::InboundEvent;

pub async fn callback_handler(
    engine: &ConversationEngine,
    event: &InboundEvent,
    query_id: &str,
    data: &str,
) -> Result<(), BotError> {
    if let Err(e) = engine.transport.answer_callback(query_id).await {
        log::warn!("Error answering callback {}: {}", query_id, e);
    }

    let Some(action) = engine.actions.get(data) else {
        log::debug!("No action for button {:?} from user {}", data, event.user_id);
        return Ok(());
    };

    match action.act(event.user_id, event).await {
        Ok(reply) => {
            engine.reply(reply).await?;
            log::info!("Sent message to user {} for button {:?}", event.user_id, data);
            Ok(())
        }
        Err(err) => engine.report(event, err).await,
    }
}
