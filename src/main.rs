use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod actions;
mod config;
mod dispatch;
mod error;
mod handlers;
mod models;
mod notion;
mod state_store;
mod telegram;
#[cfg(test)]
mod testing;

use crate::actions::ActionRegistry;
use crate::config::Config;
use crate::dispatch::DispatchLoop;
use crate::handlers::{Command, ConversationEngine};
use crate::notion::NotionSink;
use crate::state_store::UserStateStore;
use crate::telegram::{TelegramTransport, UpdatePoller};

const INITIAL_OFFSET: i32 = 0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Загружаем .env и инициализируем логирование
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("fail to read from .env file: {}", e);
    }
    env_logger::init();
    log::info!("Starting finance form bot...");

    let config = Config::from_env()?;
    let notion_url = config
        .notion_public_url
        .as_deref()
        .map(reqwest::Url::parse)
        .transpose()?;

    let bot = Bot::new(&config.telegram_token);
    bot.set_my_commands(Command::bot_commands()).await?;
    let me = bot.get_me().await?;
    log::info!("✅ Authorized as @{}", me.username());

    let store = UserStateStore::new(config.state_shards);
    let sink = Arc::new(NotionSink::new(
        config.notion_secret.clone(),
        config.notion_database_id.clone(),
        config.notion_timeout,
    )?);
    let actions = ActionRegistry::new(store.clone(), sink, config.categories.clone());
    log::info!("🔘 Registered {} button actions", actions.len());
    let transport = Arc::new(TelegramTransport::new(bot.clone()));

    let engine = Arc::new(ConversationEngine::new(
        store,
        actions,
        transport,
        me.username().to_string(),
        notion_url,
    ));

    let token = CancellationToken::new();
    let (tx, rx) = mpsc::channel(config.queue_capacity);

    // Ctrl-C останавливает опрос и воркеров после текущего события
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Ctrl-C received, shutting down");
        }
        ctrl_c_token.cancel();
    });

    let poller = UpdatePoller::new(bot, INITIAL_OFFSET, config.poll_timeout);
    let poller_handle = tokio::spawn(poller.run(tx, token.clone()));

    DispatchLoop::new(config.workers, engine).run(rx, token.clone()).await;

    token.cancel();
    poller_handle.await?;

    log::info!("Bot stopped");
    Ok(())
}
