use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Conversation, Message};

/// 查找两人之间的会话，不区分双方角色
pub async fn find_conversation_between(
    pool: &SqlitePool,
    first: &str,
    second: &str,
) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT * FROM conversations
        WHERE (creator_id = ?1 AND actor_id = ?2)
           OR (creator_id = ?2 AND actor_id = ?1)
        LIMIT 1
        "#,
    )
    .bind(first)
    .bind(second)
    .fetch_optional(pool)
    .await
}

/// 插入会话；这对用户已有会话时不写入并返回 false
pub async fn insert_conversation(pool: &SqlitePool, conversation: &Conversation) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO conversations (id, creator_id, actor_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&conversation.id)
    .bind(&conversation.creator_id)
    .bind(&conversation.actor_id)
    .bind(conversation.created_at)
    .bind(conversation.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// 用户参与的会话，最近活跃在前
pub async fn list_conversations(pool: &SqlitePool, user_id: &str) -> Result<Vec<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT * FROM conversations
        WHERE creator_id = ?1 OR actor_id = ?1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// 写入消息并刷新会话活跃时间
pub async fn insert_message(pool: &SqlitePool, message: &Message) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO messages (id, conversation_id, sender_id, content, created_at, read_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&message.id)
    .bind(&message.conversation_id)
    .bind(&message.sender_id)
    .bind(&message.content)
    .bind(message.created_at)
    .bind(message.read_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(message.created_at)
        .bind(&message.conversation_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// 按时间正序列出消息；`since` 只返回之后的新消息
pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: &str,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<Message>, sqlx::Error> {
    match since {
        Some(since) => {
            sqlx::query_as::<_, Message>(
                "SELECT * FROM messages WHERE conversation_id = ? AND created_at > ? ORDER BY created_at ASC, rowid ASC",
            )
            .bind(conversation_id)
            .bind(since)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Message>(
                "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, rowid ASC",
            )
            .bind(conversation_id)
            .fetch_all(pool)
            .await
        }
    }
}

/// 将对方发来的未读消息标记为已读，返回标记数量
pub async fn mark_read(pool: &SqlitePool, conversation_id: &str, reader_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET read_at = ? WHERE conversation_id = ? AND sender_id != ? AND read_at IS NULL",
    )
    .bind(Utc::now())
    .bind(conversation_id)
    .bind(reader_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
