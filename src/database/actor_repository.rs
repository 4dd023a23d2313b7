use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{ActorListFilters, ActorProfile, ActorRow, PortfolioItem, Review};

fn decode_row(row: ActorRow) -> Result<ActorProfile, sqlx::Error> {
    ActorProfile::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn decode_rows(rows: Vec<ActorRow>) -> Result<Vec<ActorProfile>, sqlx::Error> {
    rows.into_iter().map(decode_row).collect()
}

/// 插入演员
pub async fn insert_actor(pool: &SqlitePool, actor: &ActorProfile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO actors (
            id, user_id, name, avatar_url, tagline, bio, languages, video_types, tones,
            base_price, express_delivery_price, express_delivery_time, standard_delivery_time,
            rating, review_count, featured, verified, completed_orders,
            average_response_time, next_available, working_hours, timezone, packages,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&actor.id)
    .bind(&actor.user_id)
    .bind(&actor.name)
    .bind(&actor.avatar_url)
    .bind(&actor.tagline)
    .bind(&actor.bio)
    .bind(actor.languages_json())
    .bind(actor.video_types_json())
    .bind(actor.tones_json())
    .bind(actor.base_price)
    .bind(actor.express_delivery_price)
    .bind(actor.express_delivery_time)
    .bind(actor.standard_delivery_time)
    .bind(actor.rating)
    .bind(actor.review_count)
    .bind(actor.featured)
    .bind(actor.verified)
    .bind(actor.completed_orders)
    .bind(&actor.average_response_time)
    .bind(&actor.next_available)
    .bind(&actor.working_hours)
    .bind(&actor.timezone)
    .bind(actor.packages_json())
    .bind(actor.created_at)
    .bind(actor.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 获取演员
pub async fn get_actor(pool: &SqlitePool, id: &str) -> Result<Option<ActorProfile>, sqlx::Error> {
    let row = sqlx::query_as::<_, ActorRow>("SELECT * FROM actors WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(decode_row).transpose()
}

/// 全部演员，按插入顺序
pub async fn list_all_actors(pool: &SqlitePool) -> Result<Vec<ActorProfile>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ActorRow>("SELECT * FROM actors ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    decode_rows(rows)
}

/// 分页列出演员，返回 (当前页, 总数)
pub async fn list_actors(
    pool: &SqlitePool,
    filters: &ActorListFilters,
) -> Result<(Vec<ActorProfile>, i64), sqlx::Error> {
    let limit = filters.limit.unwrap_or(50).clamp(1, 200);
    let offset = filters.offset.unwrap_or(0).max(0);

    let (rows, total) = match filters.featured {
        Some(featured) => {
            let rows = sqlx::query_as::<_, ActorRow>(
                "SELECT * FROM actors WHERE featured = ? ORDER BY rowid LIMIT ? OFFSET ?",
            )
            .bind(featured)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actors WHERE featured = ?")
                .bind(featured)
                .fetch_one(pool)
                .await?;
            (rows, total)
        }
        None => {
            let rows = sqlx::query_as::<_, ActorRow>(
                "SELECT * FROM actors ORDER BY rowid LIMIT ? OFFSET ?",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actors")
                .fetch_one(pool)
                .await?;
            (rows, total)
        }
    };

    Ok((decode_rows(rows)?, total))
}

/// 保存已修改的演员对象
pub async fn update_actor(pool: &SqlitePool, actor: &ActorProfile) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE actors
        SET name = ?, avatar_url = ?, tagline = ?, bio = ?, languages = ?, video_types = ?,
            tones = ?, base_price = ?, express_delivery_price = ?, express_delivery_time = ?,
            standard_delivery_time = ?, featured = ?, verified = ?, average_response_time = ?,
            next_available = ?, working_hours = ?, timezone = ?, packages = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&actor.name)
    .bind(&actor.avatar_url)
    .bind(&actor.tagline)
    .bind(&actor.bio)
    .bind(actor.languages_json())
    .bind(actor.video_types_json())
    .bind(actor.tones_json())
    .bind(actor.base_price)
    .bind(actor.express_delivery_price)
    .bind(actor.express_delivery_time)
    .bind(actor.standard_delivery_time)
    .bind(actor.featured)
    .bind(actor.verified)
    .bind(&actor.average_response_time)
    .bind(&actor.next_available)
    .bind(&actor.working_hours)
    .bind(&actor.timezone)
    .bind(actor.packages_json())
    .bind(actor.updated_at)
    .bind(&actor.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 删除演员，评价与作品集级联删除
pub async fn delete_actor(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM actors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_actors(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM actors")
        .fetch_one(pool)
        .await
}

/// 评价列表，最新在前
pub async fn list_reviews(pool: &SqlitePool, actor_id: &str) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE actor_id = ? ORDER BY created_at DESC",
    )
    .bind(actor_id)
    .fetch_all(pool)
    .await
}

/// 原样写入评价，不更新演员汇总（用于导入历史数据）
pub async fn insert_review_raw(pool: &SqlitePool, review: &Review) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, actor_id, creator_id, creator_name, creator_avatar_url, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&review.id)
    .bind(&review.actor_id)
    .bind(&review.creator_id)
    .bind(&review.creator_name)
    .bind(&review.creator_avatar_url)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 新增评价并更新演员评分与评价数
///
/// 评分按已有均值与评价数增量计算，保留一位小数。
pub async fn add_review(pool: &SqlitePool, review: &Review) -> Result<ActorProfile, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ActorRow>("SELECT * FROM actors WHERE id = ?")
        .bind(&review.actor_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let mut actor = decode_row(row)?;

    sqlx::query(
        r#"
        INSERT INTO reviews (id, actor_id, creator_id, creator_name, creator_avatar_url, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&review.id)
    .bind(&review.actor_id)
    .bind(&review.creator_id)
    .bind(&review.creator_name)
    .bind(&review.creator_avatar_url)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.created_at)
    .execute(&mut *tx)
    .await?;

    let count = actor.review_count.max(0);
    actor.rating = rolling_rating(actor.rating, count, review.rating);
    actor.review_count = count.saturating_add(1);
    actor.updated_at = Utc::now();

    sqlx::query("UPDATE actors SET rating = ?, review_count = ?, updated_at = ? WHERE id = ?")
        .bind(actor.rating)
        .bind(actor.review_count)
        .bind(actor.updated_at)
        .bind(&actor.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(actor)
}

fn rolling_rating(current: f64, count: i32, new_rating: f64) -> f64 {
    let total = current * f64::from(count) + new_rating;
    let mean = total / (f64::from(count) + 1.0);
    (mean * 10.0).round() / 10.0
}

pub async fn insert_portfolio_item(pool: &SqlitePool, item: &PortfolioItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO portfolio_items (id, actor_id, title, description, video_url, thumbnail_url, video_type, language, tone, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.actor_id)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.video_url)
    .bind(&item.thumbnail_url)
    .bind(&item.video_type)
    .bind(&item.language)
    .bind(&item.tone)
    .bind(item.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 作品集，最新在前
pub async fn list_portfolio(pool: &SqlitePool, actor_id: &str) -> Result<Vec<PortfolioItem>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioItem>(
        "SELECT * FROM portfolio_items WHERE actor_id = ? ORDER BY created_at DESC",
    )
    .bind(actor_id)
    .fetch_all(pool)
    .await
}
