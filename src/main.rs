use std::time::Duration;

use faceup_backend::{
    api::{self, AppState},
    config::AppConfig,
    database::{seed, Database},
    services::{ActorCatalog, SessionCleanupTask},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    // Initialize database
    let database = Database::connect(&config.database_url).await?;
    if config.seed_fixtures {
        seed::seed_fixtures(database.pool()).await?;
    }

    let catalog = ActorCatalog::load(&database).await?;
    let addr = config.socket_addr()?;
    let state = AppState::new(database, catalog, config);

    // Start session cleanup task
    let cleanup_task = SessionCleanupTask::new(state.sessions.clone(), Duration::from_secs(60));
    tokio::spawn(cleanup_task.start());

    let app = api::router(state);

    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!("📊 Session cleanup task started (interval: 60 seconds)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
