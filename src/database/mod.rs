use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};

use crate::models::ActorProfile;
use crate::services::CandidateSource;

pub mod actor_repository;
pub mod message_repository;
pub mod order_repository;
pub mod profile_repository;
pub mod schema;
pub mod seed;

pub use actor_repository::*;
pub use message_repository::*;
pub use order_repository::*;
pub use profile_repository::*;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(30));

        // SQLite 单写入者；内存库也依赖单连接才能共享同一份数据
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await?;

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;

        schema::verify_schema(&pool).await?;

        let stats = schema::get_database_stats(&pool).await?;
        tracing::info!(
            "Database initialized - Actors: {}, Orders: {}, Conversations: {}, Size: {:.2} MB",
            stats.actor_count,
            stats.order_count,
            stats.conversation_count,
            stats.database_size_mb()
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// 获取数据库统计信息
    pub async fn get_stats(&self) -> Result<schema::DatabaseStats> {
        schema::get_database_stats(&self.pool).await
    }

    /// 验证数据库完整性
    pub async fn verify_integrity(&self) -> Result<()> {
        schema::verify_schema(&self.pool).await
    }
}

#[async_trait]
impl CandidateSource for Database {
    async fn load_candidates(&self) -> Result<Vec<ActorProfile>> {
        Ok(actor_repository::list_all_actors(&self.pool).await?)
    }
}
