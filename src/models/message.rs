use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{StringValidator, ValidationError};

/// 创作者与演员之间的会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub creator_id: String,
    pub actor_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 会话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    pub creator_id: String,
    pub actor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub reader_id: String,
}

impl Conversation {
    pub fn new(creator_id: String, actor_id: String) -> Result<Self, ValidationError> {
        if creator_id == actor_id {
            return Err(ValidationError::SelfConversation);
        }

        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            creator_id,
            actor_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.creator_id == user_id || self.actor_id == user_id
    }
}

impl Message {
    pub fn new(conversation_id: String, sender_id: String, content: &str) -> Result<Self, ValidationError> {
        let content = StringValidator::normalize_message(content)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id,
            sender_id,
            content,
            created_at: Utc::now(),
            read_at: None,
        })
    }
}
