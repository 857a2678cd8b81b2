use std::time::Duration;

use teloxide::prelude::*;
use teloxide::requests::Request;
use teloxide::types::AllowedUpdate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::InboundEvent;

/// Long polling `getUpdates`: единственный производитель входящей очереди.
pub struct UpdatePoller {
    bot: Bot,
    offset: i32,
    timeout: Duration,
}

impl UpdatePoller {
    pub fn new(bot: Bot, offset: i32, timeout: Duration) -> Self {
        Self {
            bot,
            offset,
            timeout,
        }
    }

    pub async fn run(mut self, tx: mpsc::Sender<InboundEvent>, token: CancellationToken) {
        log::info!("📡 Polling updates (timeout {:?})", self.timeout);

        loop {
            let request = self
                .bot
                .get_updates()
                .offset(self.offset)
                .timeout(self.timeout.as_secs() as u32)
                .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);

            let updates = tokio::select! {
                _ = token.cancelled() => break,
                result = request.send() => result,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    log::error!("Error fetching updates: {}", e);
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(Duration::from_secs(1)) => continue,
                    }
                }
            };

            for update in updates {
                self.offset = update.id.as_offset();
                let Some(event) = InboundEvent::from_update(update) else {
                    continue;
                };
                if tx.send(event).await.is_err() {
                    log::warn!("Inbound queue closed, stopping poller");
                    return;
                }
            }
        }

        log::info!("📴 Update poller stopped");
    }
}
