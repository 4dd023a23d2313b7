use sqlx::SqlitePool;

use crate::models::{Order, OrderListFilters};

/// 插入订单
pub async fn insert_order(pool: &SqlitePool, order: &Order) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, creator_id, actor_id, package_name, status, project_title, instructions,
            script_url, assets_url, video_url, express_delivery, price, revisions_left,
            delivery_date, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&order.id)
    .bind(&order.creator_id)
    .bind(&order.actor_id)
    .bind(&order.package_name)
    .bind(&order.status)
    .bind(&order.project_title)
    .bind(&order.instructions)
    .bind(&order.script_url)
    .bind(&order.assets_url)
    .bind(&order.video_url)
    .bind(order.express_delivery)
    .bind(order.price)
    .bind(order.revisions_left)
    .bind(order.delivery_date)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_order(pool: &SqlitePool, id: &str) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// 按创作者和/或演员列出订单，最新在前
pub async fn list_orders(pool: &SqlitePool, filters: &OrderListFilters) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT * FROM orders
        WHERE (?1 IS NULL OR creator_id = ?1)
          AND (?2 IS NULL OR actor_id = ?2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&filters.creator_id)
    .bind(&filters.actor_id)
    .fetch_all(pool)
    .await
}

/// 保存状态变化（状态、成片地址、剩余修改次数）
pub async fn update_order_status(pool: &SqlitePool, order: &Order) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = ?, video_url = ?, revisions_left = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&order.status)
    .bind(&order.video_url)
    .bind(order.revisions_left)
    .bind(order.updated_at)
    .bind(&order.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
