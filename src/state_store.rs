use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::UserId;
use tokio::sync::RwLock;

use crate::error::StateError;
use crate::models::UserState;

type Shard = RwLock<HashMap<UserId, UserState>>;

pub const DEFAULT_SHARDS: usize = 16;

/// Состояния диалогов в памяти процесса, разбитые на шарды по id пользователя.
///
/// Пользователи из разных шардов не блокируют друг друга; операции над одним
/// пользователем линеаризуются замком его шарда. Наружу отдаются только копии.
#[derive(Clone)]
pub struct UserStateStore {
    shards: Arc<Vec<Shard>>,
}

impl Default for UserStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_SHARDS)
    }
}

impl UserStateStore {
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1)).map(|_| RwLock::new(HashMap::new())).collect();
        Self {
            shards: Arc::new(shards),
        }
    }

    fn shard(&self, user_id: UserId) -> &Shard {
        &self.shards[(user_id.0 % self.shards.len() as u64) as usize]
    }

    pub async fn get(&self, user_id: UserId) -> Option<UserState> {
        self.shard(user_id).read().await.get(&user_id).cloned()
    }

    pub async fn save(&self, user_id: UserId, state: UserState) -> Result<(), StateError> {
        self.shard(user_id).write().await.insert(user_id, state);
        log::debug!("💾 State saved for user {}", user_id);
        Ok(())
    }

    pub async fn reset(&self, user_id: UserId) -> Result<(), StateError> {
        let mut shard = self.shard(user_id).write().await;
        match shard.get_mut(&user_id) {
            Some(state) => {
                *state = UserState::default();
                log::debug!("🧹 State reset for user {}", user_id);
                Ok(())
            }
            None => Err(StateError::NotFound(user_id)),
        }
    }

    /// Первое обращение пользователя создаёт для него пустое состояние.
    pub async fn get_or_create(&self, user_id: UserId) -> UserState {
        let mut shard = self.shard(user_id).write().await;
        shard
            .entry(user_id)
            .or_insert_with(|| {
                log::info!("👤 New user state created for {}", user_id);
                UserState::default()
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        let mut total = 0;
        for shard in self.shards.iter() {
            total += shard.read().await.len();
        }
        total
    }
}
