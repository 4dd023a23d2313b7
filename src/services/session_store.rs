use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use super::search_session::SearchSession;
use crate::models::ActorProfile;

/// 会话存储，闲置超时后自动淘汰
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, Arc<SearchSession>>,
    search_delay: Duration,
}

impl SessionStore {
    pub fn new(capacity: u64, idle_timeout: Duration, search_delay: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle_timeout)
            .build();

        Self {
            sessions,
            search_delay,
        }
    }

    /// 用目录快照创建新会话
    pub async fn create(&self, candidates: Arc<Vec<ActorProfile>>) -> Arc<SearchSession> {
        let session = SearchSession::new(candidates, self.search_delay);
        self.sessions
            .insert(session.id().to_string(), Arc::clone(&session))
            .await;
        tracing::info!("Created search session {}", session.id());
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<SearchSession>> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &str) -> bool {
        match self.sessions.remove(id).await {
            Some(session) => {
                session.cancel().await;
                tracing::info!("Removed search session {}", id);
                true
            }
            None => false,
        }
    }

    /// 近似值，淘汰是惰性的
    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn run_pending_tasks(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

/// 定期触发会话淘汰
pub struct SessionCleanupTask {
    store: SessionStore,
    interval: Duration,
}

impl SessionCleanupTask {
    pub fn new(store: SessionStore, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// 启动定期清理任务
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.store.run_pending_tasks().await;
            tracing::debug!("Session cleanup completed. Active sessions: {}", self.store.len());
        }
    }
}
