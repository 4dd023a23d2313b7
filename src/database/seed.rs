//! 演示数据导入
//!
//! 仅在 actors 表为空时写入 `fixtures/seed.json` 中的演员、评价与作品集。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use super::actor_repository;
use crate::models::{ActorProfile, CreateActorRequest, PortfolioItem, Review};

const SEED_JSON: &str = include_str!("../../fixtures/seed.json");

#[derive(Debug, Deserialize)]
struct SeedFile {
    actors: Vec<SeedActor>,
}

#[derive(Debug, Deserialize)]
struct SeedActor {
    #[serde(flatten)]
    actor: CreateActorRequest,
    #[serde(default)]
    reviews: Vec<SeedReview>,
    #[serde(default)]
    portfolio: Vec<SeedPortfolio>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedReview {
    id: String,
    creator_id: String,
    creator_name: String,
    creator_avatar_url: Option<String>,
    rating: f64,
    comment: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedPortfolio {
    id: String,
    title: String,
    description: String,
    video_url: String,
    thumbnail_url: String,
    video_type: String,
    language: String,
    tone: String,
    created_at: DateTime<Utc>,
}

/// 导入内置演示数据，返回写入的演员数量（已有数据时为 0）
pub async fn seed_fixtures(pool: &SqlitePool) -> Result<usize> {
    seed_from_str(pool, SEED_JSON).await
}

pub async fn seed_from_str(pool: &SqlitePool, json: &str) -> Result<usize> {
    let existing = actor_repository::count_actors(pool).await?;
    if existing > 0 {
        tracing::info!("Skipping fixture seeding, {} actors already present", existing);
        return Ok(0);
    }

    let seed: SeedFile = serde_json::from_str(json).context("Failed to parse seed fixtures")?;
    let count = seed.actors.len();

    for entry in seed.actors {
        let actor = ActorProfile::from_create_request(entry.actor)
            .map_err(|e| anyhow::anyhow!("Invalid seed actor: {}", e))?;
        actor_repository::insert_actor(pool, &actor).await?;

        for review in entry.reviews {
            let review = Review {
                id: review.id,
                actor_id: actor.id.clone(),
                creator_id: review.creator_id,
                creator_name: review.creator_name,
                creator_avatar_url: review.creator_avatar_url,
                rating: review.rating,
                comment: review.comment,
                created_at: review.created_at,
            };
            actor_repository::insert_review_raw(pool, &review).await?;
        }

        for item in entry.portfolio {
            let item = PortfolioItem {
                id: item.id,
                actor_id: actor.id.clone(),
                title: item.title,
                description: item.description,
                video_url: item.video_url,
                thumbnail_url: item.thumbnail_url,
                video_type: item.video_type,
                language: item.language,
                tone: item.tone,
                created_at: item.created_at,
            };
            actor_repository::insert_portfolio_item(pool, &item).await?;
        }

        tracing::debug!("Seeded actor {} ({})", actor.name, actor.id);
    }

    tracing::info!("Seeded {} actors from fixtures", count);
    Ok(count)
}
