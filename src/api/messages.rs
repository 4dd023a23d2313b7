//! 会话与消息；客户端通过 `since` 轮询新消息

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;
use crate::{
    database::{
        find_conversation_between, get_conversation, insert_conversation, insert_message,
        list_conversations, list_messages, mark_read,
    },
    models::{
        Conversation, MarkReadRequest, Message, SendMessageRequest, StartConversationRequest,
    },
};

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub since: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub conversation_id: String,
    pub marked: u64,
}

async fn load_conversation(state: &AppState, id: &str) -> ApiResult<Conversation> {
    get_conversation(state.database.pool(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Conversation {} not found", id)))
}

/// POST /api/conversations - 已有会话（任一方向）直接返回，否则新建
pub async fn start_conversation_handler(
    State(state): State<AppState>,
    Json(payload): Json<StartConversationRequest>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.database.pool();

    if let Some(existing) =
        find_conversation_between(pool, &payload.creator_id, &payload.actor_id).await?
    {
        return Ok((StatusCode::OK, success(existing)));
    }

    let conversation = Conversation::new(payload.creator_id, payload.actor_id)?;
    let inserted = insert_conversation(pool, &conversation).await.map_err(|e| {
        tracing::error!("Failed to start conversation: {}", e);
        ApiError::from(e)
    })?;
    if !inserted {
        // 并发请求已先建立会话
        let existing = find_conversation_between(pool, &conversation.creator_id, &conversation.actor_id)
            .await?
            .ok_or_else(|| ApiError::Internal("Conversation vanished after insert conflict".to_string()))?;
        return Ok((StatusCode::OK, success(existing)));
    }
    tracing::info!(
        "Conversation {} started between {} and {}",
        conversation.id,
        conversation.creator_id,
        conversation.actor_id
    );

    Ok((StatusCode::CREATED, success(conversation)))
}

/// GET /api/conversations?user_id=
pub async fn list_conversations_handler(
    State(state): State<AppState>,
    Query(params): Query<ConversationQuery>,
) -> ApiResult<impl IntoResponse> {
    let conversations = list_conversations(state.database.pool(), &params.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list conversations for {}: {}", params.user_id, e);
            ApiError::Internal("Failed to retrieve conversations".to_string())
        })?;
    Ok(success(conversations))
}

/// GET /api/conversations/:id/messages?since=
pub async fn list_messages_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<MessagesQuery>,
) -> ApiResult<impl IntoResponse> {
    load_conversation(&state, &id).await?;
    let messages = list_messages(state.database.pool(), &id, params.since).await?;
    Ok(success(messages))
}

/// POST /api/conversations/:id/messages
pub async fn send_message_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let conversation = load_conversation(&state, &id).await?;
    if !conversation.has_participant(&payload.sender_id) {
        return Err(ApiError::BadRequest(format!(
            "{} is not a participant of conversation {}",
            payload.sender_id, id
        )));
    }

    let message = Message::new(id, payload.sender_id, &payload.content)?;
    insert_message(state.database.pool(), &message).await.map_err(|e| {
        tracing::error!("Failed to send message in {}: {}", message.conversation_id, e);
        ApiError::Internal("Failed to send message".to_string())
    })?;

    Ok((StatusCode::CREATED, success(message)))
}

/// POST /api/conversations/:id/read
pub async fn mark_read_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MarkReadRequest>,
) -> ApiResult<impl IntoResponse> {
    let conversation = load_conversation(&state, &id).await?;
    if !conversation.has_participant(&payload.reader_id) {
        return Err(ApiError::BadRequest(format!(
            "{} is not a participant of conversation {}",
            payload.reader_id, id
        )));
    }

    let marked = mark_read(state.database.pool(), &id, &payload.reader_id).await?;
    Ok(success(MarkReadResponse {
        conversation_id: id,
        marked,
    }))
}
