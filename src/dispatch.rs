//! Пул воркеров, разбирающих одну общую очередь входящих событий.
//!
//! События одного пользователя могут обработаться не в порядке поступления,
//! если их одновременно заберут два воркера: замок хранилища защищает
//! состояние от порчи, но не упорядочивает события.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::handlers::ConversationEngine;
use crate::models::InboundEvent;

type SharedReceiver = Arc<Mutex<mpsc::Receiver<InboundEvent>>>;

pub struct DispatchLoop {
    workers: usize,
    engine: Arc<ConversationEngine>,
}

impl DispatchLoop {
    pub fn new(workers: usize, engine: Arc<ConversationEngine>) -> Self {
        Self {
            workers: workers.max(1),
            engine,
        }
    }

    /// Работает, пока не сработает токен или не закроется очередь.
    /// Начатое событие всегда дообрабатывается.
    pub async fn run(self, rx: mpsc::Receiver<InboundEvent>, token: CancellationToken) {
        let rx: SharedReceiver = Arc::new(Mutex::new(rx));
        let mut workers = JoinSet::new();

        for worker_id in 0..self.workers {
            workers.spawn(worker(worker_id, self.engine.clone(), rx.clone(), token.clone()));
        }
        log::info!("🚀 Started {} dispatch workers", self.workers);

        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                log::error!("Dispatch worker panicked: {}", e);
            }
        }
        log::info!(
            "🛑 All dispatch workers stopped, {} users in memory",
            self.engine.store().len().await
        );
    }
}

async fn worker(
    worker_id: usize,
    engine: Arc<ConversationEngine>,
    rx: SharedReceiver,
    token: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = token.cancelled() => {
                log::warn!("Worker {} cancelled", worker_id);
                return;
            }
            event = next_event(&rx) => event,
        };

        let Some(event) = event else {
            log::error!("Worker {}: updates channel is closed", worker_id);
            return;
        };

        process(&engine, &event).await;
    }
}

async fn next_event(rx: &SharedReceiver) -> Option<InboundEvent> {
    rx.lock().await.recv().await
}

async fn process(engine: &ConversationEngine, event: &InboundEvent) {
    engine.store().get_or_create(event.user_id).await;

    if let Err(err) = engine.handle(event).await {
        if err.is_expected() {
            log::warn!("Event from user {} rejected: {}", event.user_id, err);
        } else {
            log::error!("Error processing event from user {}: {}", event.user_id, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use teloxide::types::UserId;

    use crate::actions::ActionRegistry;
    use crate::models::{CurrentOperation, UserState};
    use crate::state_store::UserStateStore;
    use crate::testing::{callback_event, text_event, FakeSink, RecordingTransport};

    fn engine() -> (Arc<ConversationEngine>, Arc<RecordingTransport>, Arc<FakeSink>) {
        engine_with(FakeSink::default())
    }

    fn engine_with(
        sink: FakeSink,
    ) -> (Arc<ConversationEngine>, Arc<RecordingTransport>, Arc<FakeSink>) {
        let store = UserStateStore::new(4);
        let sink = Arc::new(sink);
        let transport = Arc::new(RecordingTransport::default());
        let actions = ActionRegistry::new(store.clone(), sink.clone(), vec!["продукты".into()]);
        let engine = ConversationEngine::new(
            store,
            actions,
            transport.clone(),
            "finance_bot".into(),
            None,
        );
        (Arc::new(engine), transport, sink)
    }

    #[tokio::test]
    async fn drains_queue_and_stops_when_closed() {
        let (engine, transport, _) = engine();
        let (tx, rx) = mpsc::channel(16);

        for user in 1..=5 {
            tx.send(text_event(user, "привет")).await.unwrap();
        }
        drop(tx);

        DispatchLoop::new(3, engine.clone())
            .run(rx, CancellationToken::new())
            .await;

        assert_eq!(transport.texts().len(), 5);
        assert_eq!(engine.store().len().await, 5);
    }

    #[tokio::test]
    async fn first_contact_creates_state() {
        let (engine, _, _) = engine();
        let (tx, rx) = mpsc::channel(4);

        tx.send(text_event(77, "/reset")).await.unwrap();
        drop(tx);

        DispatchLoop::new(1, engine.clone())
            .run(rx, CancellationToken::new())
            .await;

        assert!(engine.store().get(UserId(77)).await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn unknown_command_does_not_stop_workers() {
        let (engine, transport, _) = engine();
        let (tx, rx) = mpsc::channel(4);

        tx.send(text_event(1, "/nope")).await.unwrap();
        tx.send(text_event(1, "/start")).await.unwrap();
        drop(tx);

        DispatchLoop::new(1, engine).run(rx, CancellationToken::new()).await;

        assert_eq!(
            transport.texts(),
            vec!["Неизвестная команда: nope".to_string(), "Выберите действие".to_string()]
        );
    }

    #[tokio::test]
    async fn cancellation_stops_idle_workers() {
        let (engine, _, _) = engine();
        let (tx, rx) = mpsc::channel::<InboundEvent>(4);
        let token = CancellationToken::new();

        let handle = tokio::spawn(DispatchLoop::new(4, engine).run(rx, token.clone()));
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("workers did not stop")
            .unwrap();
        drop(tx);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn full_wizard_through_pool() {
        let (engine, _, sink) = engine();
        let (tx, rx) = mpsc::channel(16);
        let token = CancellationToken::new();
        let handle = tokio::spawn(DispatchLoop::new(2, engine.clone()).run(rx, token.clone()));

        // Шаги одного пользователя отправляются по одному, чтобы порядок сохранился.
        let steps = [
            callback_event(3, "снятие"),
            text_event(3, "12.5"),
            callback_event(3, "продукты"),
            text_event(3, "хлеб"),
        ];
        for step in steps {
            let before = engine.store().get(UserId(3)).await;
            tx.send(step).await.unwrap();
            wait_for_change(&engine, before).await;
        }

        token.cancel();
        handle.await.unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 12.5);
        assert_eq!(records[0].category, "продукты");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cancellation_finishes_in_flight_submit() {
        let (engine, _, sink) = engine_with(FakeSink::slow(Duration::from_millis(300)));
        let (tx, rx) = mpsc::channel(16);
        let token = CancellationToken::new();
        let handle = tokio::spawn(DispatchLoop::new(2, engine.clone()).run(rx, token.clone()));

        for step in [callback_event(3, "пополнить"), text_event(3, "20")] {
            let before = engine.store().get(UserId(3)).await;
            tx.send(step).await.unwrap();
            wait_for_change(&engine, before).await;
        }

        // Комментарий сохраняется сразу, а запись в хранилище идёт 300 мс.
        let before = engine.store().get(UserId(3)).await;
        tx.send(text_event(3, "зарплата")).await.unwrap();
        wait_for_change(&engine, before).await;
        assert_eq!(
            engine.store().get(UserId(3)).await.unwrap().current_operation,
            CurrentOperation::Complete
        );
        assert!(sink.records().is_empty());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("workers did not stop")
            .unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].comment, "зарплата");
        assert!(engine.store().get(UserId(3)).await.unwrap().is_zero());
    }

    async fn wait_for_change(engine: &ConversationEngine, before: Option<UserState>) {
        for _ in 0..200 {
            if engine.store().get(UserId(3)).await != before {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("state did not change");
    }
}
