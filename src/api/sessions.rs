use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use super::response::{success, success_message};
use super::AppState;
use crate::models::{FilterCriteria, RemoveFilterRequest};
use crate::services::{SearchSession, SelectionChange};

/// 提交后返回的代号，客户端据此判断结果是否为最新
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub generation: u64,
    pub loading: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub change: SelectionChange,
    pub selection: Vec<String>,
    pub can_compare: bool,
}

async fn find_session(state: &AppState, id: &str) -> ApiResult<Arc<SearchSession>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| crate::api_error!(NotFound, format!("Search session {} not found", id)))
}

/// POST /api/sessions - 基于当前目录快照创建会话
pub async fn create_session(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let snapshot = state.catalog.snapshot().await;
    let session = state.sessions.create(snapshot).await;
    Ok((StatusCode::CREATED, success(session.view().await)))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    Ok(success(session.view().await))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !state.sessions.remove(&id).await {
        return Err(ApiError::NotFound(format!("Search session {} not found", id)));
    }
    Ok(success_message("Search session closed"))
}

/// PUT /api/sessions/:id/criteria - 延迟计算，新的提交覆盖旧的
pub async fn submit_criteria(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(criteria): Json<FilterCriteria>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    let generation = session.submit(criteria).await;
    Ok((
        StatusCode::ACCEPTED,
        success(SubmitResponse {
            generation,
            loading: true,
        }),
    ))
}

/// POST /api/sessions/:id/filters/remove
pub async fn remove_filter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RemoveFilterRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    let generation = session
        .remove_filter(payload.dimension, payload.value.as_deref())
        .await;
    Ok((
        StatusCode::ACCEPTED,
        success(SubmitResponse {
            generation,
            loading: true,
        }),
    ))
}

/// POST /api/sessions/:id/reset - 清空条件，立即返回完整列表
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    session.reset().await;
    Ok(success(session.view().await))
}

/// POST /api/sessions/:id/selection/:actor_id - 切换对比选择
pub async fn toggle_selection(
    State(state): State<AppState>,
    Path((id, actor_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    if !session.candidates().iter().any(|a| a.id == actor_id) {
        return Err(ApiError::NotFound(format!("Actor {} not found", actor_id)));
    }

    let change = session.toggle_selection(&actor_id).await;
    let selection = session.selection().await;
    Ok(success(SelectionResponse {
        change,
        selection: selection.ids().to_vec(),
        can_compare: selection.can_compare(),
    }))
}

/// GET /api/sessions/:id/compare
pub async fn compare(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    Ok(success(session.comparison().await))
}

/// GET /api/sessions/:id/recent
pub async fn recent_searches(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    Ok(success(session.recent_searches().await))
}

/// DELETE /api/sessions/:id/recent
pub async fn clear_recent_searches(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&state, &id).await?;
    session.clear_recent().await;
    Ok(success_message("Recent searches cleared"))
}
