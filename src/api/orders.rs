use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;
use crate::{
    database::{get_actor, get_order, insert_order, list_orders, update_order_status},
    models::{
        ActorProfile, CreateOrderRequest, Order, OrderListFilters, OrderStatus, QuoteRequest,
        UpdateOrderStatusRequest,
    },
    services::orders::quote,
};

async fn load_actor(state: &AppState, actor_id: &str) -> ApiResult<ActorProfile> {
    get_actor(state.database.pool(), actor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Actor {} not found", actor_id)))
}

/// POST /api/orders/quote - 计算价格与交付日期，不落库
pub async fn quote_handler(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let actor = load_actor(&state, &payload.actor_id).await?;
    let quote = quote(
        &actor,
        payload.package_name.as_deref(),
        payload.express_delivery,
        Utc::now(),
    )?;
    Ok(success(quote))
}

/// POST /api/orders - 下单
pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.creator_id.trim().is_empty() {
        return Err(ApiError::Validation("creatorId is required".to_string()));
    }

    let actor = load_actor(&state, &payload.actor_id).await?;
    let quote = quote(
        &actor,
        payload.package_name.as_deref(),
        payload.express_delivery,
        Utc::now(),
    )?;
    let order = Order::from_quote(payload, quote);

    insert_order(state.database.pool(), &order).await.map_err(|e| {
        tracing::error!("Failed to place order for actor {}: {}", order.actor_id, e);
        ApiError::Internal("Failed to place order".to_string())
    })?;
    tracing::info!(
        "Order {} placed: creator={} actor={} price={}",
        order.id,
        order.creator_id,
        order.actor_id,
        order.price
    );

    Ok((StatusCode::CREATED, success(order)))
}

/// GET /api/orders?creator_id=&actor_id=
pub async fn list_orders_handler(
    State(state): State<AppState>,
    Query(filters): Query<OrderListFilters>,
) -> ApiResult<impl IntoResponse> {
    if filters.creator_id.is_none() && filters.actor_id.is_none() {
        return Err(ApiError::BadRequest(
            "creator_id or actor_id is required".to_string(),
        ));
    }

    let orders = list_orders(state.database.pool(), &filters).await.map_err(|e| {
        tracing::error!("Failed to list orders: {}", e);
        ApiError::Internal("Failed to retrieve orders".to_string())
    })?;
    Ok(success(orders))
}

/// GET /api/orders/:id
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let order = get_order(state.database.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {} not found", id)))?;
    Ok(success(order))
}

/// PUT /api/orders/:id/status - 按状态机推进订单
pub async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.database.pool();
    let mut order = get_order(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {} not found", id)))?;

    let previous = order.status.clone();
    order.transition(payload.status)?;
    if payload.status == OrderStatus::Delivered {
        if let Some(video_url) = payload.video_url {
            order.video_url = Some(video_url);
        }
    }

    update_order_status(pool, &order).await.map_err(|e| {
        tracing::error!("Failed to update order {}: {}", id, e);
        ApiError::Internal("Failed to update order".to_string())
    })?;
    tracing::info!("Order {} moved from {} to {}", id, previous, order.status);
    if payload.status.is_terminal() {
        tracing::debug!("Order {} closed", id);
    }

    Ok(success(order))
}
