//! 搜索会话
//!
//! 每个会话独占自己的搜索条件、对比选择和最近搜索记录。
//! 条件变化后延迟一段时间再计算结果；新的提交会取消尚未完成的旧计算，
//! 因此只有最新一代的结果会被发布。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use super::comparison::{ComparisonSelection, SelectionChange};
use super::recent_searches::RecentSearches;
use super::search_engine;
use crate::models::{ActorProfile, ComparisonRow, FilterCriteria, FilterDimension, SearchOutcome};

struct SessionState {
    criteria: FilterCriteria,
    selection: ComparisonSelection,
    recent: RecentSearches,
    generation: u64,
    pending: Option<CancellationToken>,
}

/// 会话对外视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub criteria: FilterCriteria,
    pub has_active_filters: bool,
    pub loading: bool,
    pub selection: Vec<String>,
    pub can_compare: bool,
    pub recent_searches: Vec<String>,
    pub outcome: SearchOutcome,
}

pub struct SearchSession {
    id: String,
    created_at: DateTime<Utc>,
    candidates: Arc<Vec<ActorProfile>>,
    delay: Duration,
    state: Mutex<SessionState>,
    outcome_tx: watch::Sender<SearchOutcome>,
}

impl SearchSession {
    /// 新会话立即发布第 0 代结果：全部候选，保持存储顺序
    pub fn new(candidates: Arc<Vec<ActorProfile>>, delay: Duration) -> Arc<Self> {
        let initial = SearchOutcome {
            generation: 0,
            total: candidates.len(),
            results: candidates.as_ref().clone(),
        };
        let (outcome_tx, _) = watch::channel(initial);

        Arc::new(Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            candidates,
            delay,
            state: Mutex::new(SessionState {
                criteria: FilterCriteria::default(),
                selection: ComparisonSelection::new(),
                recent: RecentSearches::new(),
                generation: 0,
                pending: None,
            }),
            outcome_tx,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn candidates(&self) -> &[ActorProfile] {
        &self.candidates
    }

    /// 提交新的搜索条件，返回本次提交的代号
    pub async fn submit(self: &Arc<Self>, criteria: FilterCriteria) -> u64 {
        let mut state = self.state.lock().await;
        self.schedule(&mut state, criteria)
    }

    /// 在持有状态锁时替换条件并启动防抖计算
    fn schedule(self: &Arc<Self>, state: &mut SessionState, criteria: FilterCriteria) -> u64 {
        Self::cancel_pending(state, &self.id);

        if let Some(term) = criteria.term() {
            if state.criteria.term() != Some(term) {
                state.recent.record(term);
            }
        }

        state.generation += 1;
        state.criteria = criteria.clone();
        let token = CancellationToken::new();
        state.pending = Some(token.clone());
        let generation = state.generation;

        let session = Arc::clone(self);
        tokio::spawn(async move {
            session.run(generation, criteria, token).await;
        });

        generation
    }

    async fn run(&self, generation: u64, criteria: FilterCriteria, token: CancellationToken) {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(self.delay) => {}
        }

        let results = search_engine::search(&self.candidates, &criteria);

        let mut state = self.state.lock().await;
        if token.is_cancelled() || state.generation != generation {
            return;
        }
        state.pending = None;

        tracing::debug!(
            "Session {} published generation {} ({} results)",
            self.id,
            generation,
            results.len()
        );
        self.outcome_tx.send_replace(SearchOutcome {
            generation,
            total: results.len(),
            results,
        });
    }

    fn cancel_pending(state: &mut SessionState, session_id: &str) {
        if let Some(previous) = state.pending.take() {
            previous.cancel();
            tracing::debug!(
                "Session {} superseded pending generation {}",
                session_id,
                state.generation
            );
        }
    }

    /// 移除单个过滤条件并重新提交
    pub async fn remove_filter(self: &Arc<Self>, dimension: FilterDimension, value: Option<&str>) -> u64 {
        let mut state = self.state.lock().await;
        let mut criteria = state.criteria.clone();
        criteria.remove_filter(dimension, value);
        self.schedule(&mut state, criteria)
    }

    /// 清空条件并立即发布完整列表
    pub async fn reset(&self) -> u64 {
        let mut state = self.state.lock().await;
        Self::cancel_pending(&mut state, &self.id);
        state.criteria.reset();
        state.generation += 1;

        self.outcome_tx.send_replace(SearchOutcome {
            generation: state.generation,
            total: self.candidates.len(),
            results: self.candidates.as_ref().clone(),
        });
        state.generation
    }

    /// 取消尚未完成的计算，当前结果保持不变
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        Self::cancel_pending(&mut state, &self.id);
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchOutcome> {
        self.outcome_tx.subscribe()
    }

    pub fn latest(&self) -> SearchOutcome {
        self.outcome_tx.borrow().clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.pending.is_some()
    }

    pub async fn criteria(&self) -> FilterCriteria {
        self.state.lock().await.criteria.clone()
    }

    pub async fn toggle_selection(&self, actor_id: &str) -> SelectionChange {
        self.state.lock().await.selection.toggle(actor_id)
    }

    pub async fn selection(&self) -> ComparisonSelection {
        self.state.lock().await.selection.clone()
    }

    pub async fn comparison(&self) -> Vec<ComparisonRow> {
        let selection = self.selection().await;
        selection.project(&self.candidates)
    }

    pub async fn record_search(&self, term: &str) {
        self.state.lock().await.recent.record(term);
    }

    pub async fn recent_searches(&self) -> Vec<String> {
        self.state.lock().await.recent.terms()
    }

    pub async fn clear_recent(&self) {
        self.state.lock().await.recent.clear();
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.lock().await;
        SessionView {
            id: self.id.clone(),
            created_at: self.created_at,
            criteria: state.criteria.clone(),
            has_active_filters: state.criteria.has_active_filters(),
            loading: state.pending.is_some(),
            selection: state.selection.ids().to_vec(),
            can_compare: state.selection.can_compare(),
            recent_searches: state.recent.terms(),
            outcome: self.latest(),
        }
    }
}
