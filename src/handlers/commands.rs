use teloxide::utils::command::{BotCommands, ParseError};

use crate::error::{BotError, StateError};
use crate::handlers::keyboards::{link_keyboard, main_menu_keyboard};
use crate::handlers::ConversationEngine;
use crate::models::{InboundEvent, Reply, UserState};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "Начать работу с ботом")]
    Start,
    #[command(description = "Запросить описание взаимодействия с ботом")]
    Help,
    #[command(description = "Сбрасывает состояние заполнения данных для операции")]
    Reset,
    #[command(description = "Возвращает ссылку на notion")]
    Notion,
}

const HELP_TEXT: &str = "Бот записывает операции по счёту в notion.\n\n\
    1. /start и выберите «пополнить» или «снятие»\n\
    2. Отправьте сумму, например 150.50\n\
    3. Для снятия выберите категорию\n\
    4. Отправьте комментарий, и запись сохранится сама\n\n";

pub async fn command_handler(
    engine: &ConversationEngine,
    event: &InboundEvent,
    text: &str,
) -> Result<(), BotError> {
    let user_id = event.user_id;

    let cmd = match Command::parse(text, &engine.bot_name) {
        Ok(cmd) => cmd,
        Err(ParseError::WrongBotName(name)) => {
            log::debug!("Command for another bot @{} from user {}", name, user_id);
            return Ok(());
        }
        Err(e) => {
            let name = command_name(text);
            log::warn!("Received unknown command {:?} from user {}: {}", name, user_id, e);
            engine
                .reply(Reply::text(event.chat_id, format!("Неизвестная команда: {}", name)))
                .await?;
            return Err(BotError::UnknownCommand(name));
        }
    };

    log::info!("Received /{} command from user {}", command_name(text), user_id);

    match cmd {
        Command::Start => handle_start(engine, event).await,
        Command::Help => handle_help(engine, event).await,
        Command::Reset => handle_reset(engine, event).await,
        Command::Notion => handle_notion(engine, event).await,
    }
}

async fn handle_start(engine: &ConversationEngine, event: &InboundEvent) -> Result<(), BotError> {
    engine.store.save(event.user_id, UserState::default()).await?;

    engine
        .reply(Reply::text(event.chat_id, "Выберите действие").with_keyboard(main_menu_keyboard()))
        .await
}

async fn handle_help(engine: &ConversationEngine, event: &InboundEvent) -> Result<(), BotError> {
    let text = format!("{}{}", HELP_TEXT, Command::descriptions());
    engine.reply(Reply::text(event.chat_id, text)).await
}

async fn handle_reset(engine: &ConversationEngine, event: &InboundEvent) -> Result<(), BotError> {
    match engine.store.reset(event.user_id).await {
        Ok(()) => {}
        Err(StateError::NotFound(user_id)) => {
            engine.store.save(user_id, UserState::default()).await?;
        }
    }

    engine
        .reply(Reply::text(
            event.chat_id,
            "Статус заполнения данных для операции сброшен",
        ))
        .await
}

async fn handle_notion(engine: &ConversationEngine, event: &InboundEvent) -> Result<(), BotError> {
    let reply = match &engine.notion_url {
        Some(url) => Reply::text(event.chat_id, "Нажмите кнопку ниже, чтобы перейти в Notion:")
            .with_keyboard(link_keyboard("Открыть в Notion", url.clone())),
        None => Reply::text(event.chat_id, "Ссылка на Notion не настроена"),
    };
    engine.reply(reply).await
}

/// Имя команды без `/` и суффикса `@bot`.
fn command_name(text: &str) -> String {
    let first = text.split_whitespace().next().unwrap_or_default();
    let first = first.trim_start_matches('/');
    first.split('@').next().unwrap_or_default().to_string()
}
