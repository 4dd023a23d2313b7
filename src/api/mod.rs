pub mod actors;
pub mod error;
pub mod health;
pub mod messages;
pub mod orders;
pub mod profiles;
pub mod response;
pub mod search;
pub mod sessions;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{
    config::AppConfig,
    database::Database,
    services::{ActorCatalog, SessionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub catalog: ActorCatalog,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(database: Database, catalog: ActorCatalog, config: AppConfig) -> Self {
        let sessions = SessionStore::new(
            config.session_capacity,
            config.session_idle(),
            config.search_delay(),
        );

        Self {
            database,
            catalog,
            sessions,
            config: Arc::new(config),
        }
    }

    /// 演员数据写入后刷新目录快照；失败只记录日志，旧快照继续可用
    pub async fn refresh_catalog(&self) {
        if let Err(e) = self.catalog.reload(&self.database).await {
            tracing::error!("Failed to reload actor catalog: {}", e);
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health_check))
        .route("/api/stats", get(health::get_stats))
        // 演员
        .route(
            "/api/actors",
            get(actors::list_actors_handler).post(actors::create_actor_handler),
        )
        .route(
            "/api/actors/:id",
            get(actors::get_actor_handler)
                .put(actors::update_actor_handler)
                .delete(actors::delete_actor_handler),
        )
        .route(
            "/api/actors/:id/reviews",
            get(actors::list_reviews_handler).post(actors::create_review_handler),
        )
        // 搜索
        .route("/api/search", post(search::search_handler))
        .route("/api/search/options", get(search::filter_options_handler))
        .route("/api/search/suggestions", get(search::suggestions_handler))
        // 搜索会话
        .route("/api/sessions", post(sessions::create_session))
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/sessions/:id/criteria", put(sessions::submit_criteria))
        .route("/api/sessions/:id/filters/remove", post(sessions::remove_filter))
        .route("/api/sessions/:id/reset", post(sessions::reset_session))
        .route(
            "/api/sessions/:id/selection/:actor_id",
            post(sessions::toggle_selection),
        )
        .route("/api/sessions/:id/compare", get(sessions::compare))
        .route(
            "/api/sessions/:id/recent",
            get(sessions::recent_searches).delete(sessions::clear_recent_searches),
        )
        // 订单
        .route("/api/orders/quote", post(orders::quote_handler))
        .route(
            "/api/orders",
            get(orders::list_orders_handler).post(orders::create_order_handler),
        )
        .route("/api/orders/:id", get(orders::get_order_handler))
        .route("/api/orders/:id/status", put(orders::update_status_handler))
        // 用户资料
        .route("/api/profiles", post(profiles::signup_handler))
        .route(
            "/api/profiles/:id",
            get(profiles::get_profile_handler).put(profiles::update_profile_handler),
        )
        // 消息
        .route(
            "/api/conversations",
            get(messages::list_conversations_handler).post(messages::start_conversation_handler),
        )
        .route(
            "/api/conversations/:id/messages",
            get(messages::list_messages_handler).post(messages::send_message_handler),
        )
        .route("/api/conversations/:id/read", post(messages::mark_read_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
