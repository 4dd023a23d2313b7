use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::error::ApiResult;
use super::response::success;
use super::AppState;
use crate::models::{FilterCriteria, SearchOutcome};
use crate::services::{search, suggestions};

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
}

/// POST /api/search - 对当前目录快照做一次无状态搜索
pub async fn search_handler(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> ApiResult<impl IntoResponse> {
    let candidates = state.catalog.snapshot().await;
    let results = search(&candidates, &criteria);
    tracing::debug!(
        "Stateless search matched {} of {} candidates",
        results.len(),
        candidates.len()
    );

    Ok(success(SearchOutcome {
        generation: 0,
        total: results.len(),
        results,
    }))
}

/// GET /api/search/options - 过滤侧边栏可选项
pub async fn filter_options_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(success(state.catalog.filter_options().await))
}

/// GET /api/search/suggestions?q=
pub async fn suggestions_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> ApiResult<impl IntoResponse> {
    let term = params.q.unwrap_or_default();
    let options = state.catalog.filter_options().await;
    Ok(success(suggestions(&term, &options)))
}
