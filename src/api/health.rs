use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;

/// GET / - 服务标识
pub async fn root() -> &'static str {
    "FaceUp API Server"
}

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    state.database.verify_integrity().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::Internal("Database connection failed".to_string())
    })?;
    let catalog_size = state.catalog.len().await;

    Ok(success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "database": "connected",
        "catalogSize": catalog_size,
    })))
}

/// 获取系统统计信息
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.database.get_stats().await.map_err(|e| {
        tracing::error!("Failed to get database stats: {}", e);
        ApiError::Internal("Failed to retrieve statistics".to_string())
    })?;

    state.sessions.run_pending_tasks().await;
    let catalog_size = state.catalog.len().await;

    Ok(success(json!({
        "actorCount": stats.actor_count,
        "reviewCount": stats.review_count,
        "profileCount": stats.profile_count,
        "orderCount": stats.order_count,
        "conversationCount": stats.conversation_count,
        "messageCount": stats.message_count,
        "databaseSizeMb": stats.database_size_mb(),
        "catalogSize": catalog_size,
        "activeSessions": state.sessions.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
