use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::error::{ApiError, ApiResult};
use super::response::{paginated, success, success_message};
use super::AppState;
use crate::{
    database::{
        add_review, delete_actor, get_actor, insert_actor, list_actors, list_portfolio,
        list_reviews, update_actor,
    },
    models::{
        ActorDetailResponse, ActorListFilters, ActorProfile, CreateActorRequest,
        CreateReviewRequest, Review, UpdateActorRequest,
    },
};

/// GET /api/actors - 分页列出演员
pub async fn list_actors_handler(
    State(state): State<AppState>,
    Query(filters): Query<ActorListFilters>,
) -> ApiResult<impl IntoResponse> {
    let (actors, total) = list_actors(state.database.pool(), &filters).await.map_err(|e| {
        tracing::error!("Failed to list actors: {}", e);
        ApiError::Internal("Failed to retrieve actors".to_string())
    })?;

    let limit = filters.limit.unwrap_or(50).clamp(1, 200);
    let offset = filters.offset.unwrap_or(0).max(0);
    Ok(paginated(actors, total, limit, offset))
}

/// GET /api/actors/:id - 演员详情（包含评价与作品集）
pub async fn get_actor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.database.pool();
    let actor = get_actor(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Actor {} not found", id)))?;
    let reviews = list_reviews(pool, &id).await?;
    let portfolio = list_portfolio(pool, &id).await?;

    Ok(success(ActorDetailResponse {
        actor,
        reviews,
        portfolio,
    }))
}

/// POST /api/actors - 创建演员
pub async fn create_actor_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateActorRequest>,
) -> ApiResult<impl IntoResponse> {
    let actor = ActorProfile::from_create_request(payload)?;

    insert_actor(state.database.pool(), &actor).await.map_err(|e| {
        tracing::error!("Failed to create actor {}: {}", actor.name, e);
        ApiError::from(e)
    })?;
    tracing::info!("Created actor {} ({})", actor.name, actor.id);

    state.refresh_catalog().await;
    Ok((StatusCode::CREATED, success(actor)))
}

/// PUT /api/actors/:id - 更新演员
pub async fn update_actor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateActorRequest>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.database.pool();
    let mut actor = get_actor(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Actor {} not found", id)))?;

    actor.apply_update(payload)?;
    update_actor(pool, &actor).await.map_err(|e| {
        tracing::error!("Failed to update actor {}: {}", id, e);
        ApiError::Internal("Failed to update actor".to_string())
    })?;

    state.refresh_catalog().await;
    Ok(success(actor))
}

/// DELETE /api/actors/:id - 删除演员
pub async fn delete_actor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = delete_actor(state.database.pool(), &id).await.map_err(|e| {
        tracing::error!("Failed to delete actor {}: {}", id, e);
        ApiError::Internal("Failed to delete actor".to_string())
    })?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Actor {} not found", id)));
    }

    tracing::info!("Deleted actor {}", id);
    state.refresh_catalog().await;
    Ok(success_message("Actor deleted"))
}

/// GET /api/actors/:id/reviews
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.database.pool();
    if get_actor(pool, &id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Actor {} not found", id)));
    }

    Ok(success(list_reviews(pool, &id).await?))
}

/// POST /api/actors/:id/reviews - 新增评价，同时更新演员评分
pub async fn create_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    let review = Review::from_create_request(id.clone(), payload)?;

    let actor = add_review(state.database.pool(), &review).await.map_err(|e| match e {
        sqlx::Error::RowNotFound => ApiError::NotFound(format!("Actor {} not found", id)),
        other => {
            tracing::error!("Failed to add review for actor {}: {}", id, other);
            ApiError::Internal("Failed to add review".to_string())
        }
    })?;
    tracing::info!(
        "Actor {} reviewed: rating now {} over {} reviews",
        actor.id,
        actor.rating,
        actor.review_count
    );

    state.refresh_catalog().await;
    Ok((StatusCode::CREATED, success(review)))
}
