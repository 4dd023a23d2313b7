use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use faceup_backend::{
    api::{self, AppState},
    config::AppConfig,
    database::{seed, Database},
    services::ActorCatalog,
};

const EMMA: &str = "a1b2c3d4-0001-4000-8000-000000000001";
const MARCUS: &str = "a1b2c3d4-0002-4000-8000-000000000002";
const SOPHIA: &str = "a1b2c3d4-0003-4000-8000-000000000003";
const JAMES: &str = "a1b2c3d4-0004-4000-8000-000000000004";

async fn setup() -> Router {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        search_delay_ms: 20,
        ..Default::default()
    };
    let database = Database::connect(&config.database_url).await.unwrap();
    seed::seed_fixtures(database.pool()).await.unwrap();
    let catalog = ActorCatalog::load(&database).await.unwrap();
    api::router(AppState::new(database, catalog, config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn names(results: &Value) -> Vec<String> {
    results
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

/// 轮询会话直到指定代号的结果发布
async fn wait_for_generation(app: &Router, session_id: &str, generation: u64) -> Value {
    for _ in 0..100 {
        let (_, body) = send(app, Method::GET, &format!("/api/sessions/{}", session_id), None).await;
        if body["data"]["outcome"]["generation"].as_u64() == Some(generation) {
            return body["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("generation {} was never published", generation);
}

#[tokio::test]
async fn test_health_and_stats() {
    let app = setup().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["catalogSize"], 5);

    let (status, body) = send(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["actorCount"], 5);
    assert_eq!(body["data"]["reviewCount"], 3);
}

#[tokio::test]
async fn test_list_actors_paginated() {
    let app = setup().await;

    let (status, body) = send(&app, Method::GET, "/api/actors?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["hasMore"], true);
    assert_eq!(names(&body["data"]["items"]), vec!["Emma Johnson", "Marcus Chen"]);

    let (_, body) = send(&app, Method::GET, "/api/actors?featured=true", None).await;
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn test_actor_detail_includes_reviews_and_portfolio() {
    let app = setup().await;

    let (status, body) = send(&app, Method::GET, &format!("/api/actors/{}", EMMA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Emma Johnson");
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["portfolio"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["packages"][1]["popular"], true);

    let (status, body) = send(&app, Method::GET, "/api/actors/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_stateless_search() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/search",
        Some(json!({ "languages": ["Spanish"], "sortKey": "price-low" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(names(&body["data"]["results"]), vec!["Sophia Rodriguez", "Emma Johnson"]);

    // 空条件保持存储顺序
    let (_, body) = send(&app, Method::POST, "/api/search", Some(json!({}))).await;
    assert_eq!(names(&body["data"]["results"])[0], "Emma Johnson");
    assert_eq!(body["data"]["total"], 5);

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/search",
        Some(json!({ "minPrice": 300, "maxPrice": 100 })),
    )
    .await;
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/search",
        Some(json!({ "sortKey": "cheapest" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_filter_options_and_suggestions() {
    let app = setup().await;

    let (_, body) = send(&app, Method::GET, "/api/search/options", None).await;
    let options = &body["data"];
    assert!(options["languages"].as_array().unwrap().contains(&json!("Mandarin")));
    assert_eq!(options["minPrice"], 125.0);
    assert_eq!(options["maxPrice"], 200.0);
    assert_eq!(options["maxDeliveryTime"], 5);

    let (_, body) = send(&app, Method::GET, "/api/search/suggestions?q=ex", None).await;
    assert_eq!(body["data"], json!(["Explainer", "Tech Explainer"]));

    let (_, body) = send(&app, Method::GET, "/api/search/suggestions?q=e", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_session_debounced_search() {
    let app = setup().await;

    let (status, body) = send(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["outcome"]["generation"], 0);
    assert_eq!(body["data"]["outcome"]["total"], 5);

    let uri = format!("/api/sessions/{}/criteria", session_id);
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "languages": ["French"], "freeTextTerm": "corporate" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["generation"], 1);

    let view = wait_for_generation(&app, &session_id, 1).await;
    assert_eq!(names(&view["outcome"]["results"]), vec!["James Wilson"]);
    assert_eq!(view["hasActiveFilters"], true);
    assert_eq!(view["recentSearches"], json!(["corporate"]));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/filters/remove", session_id),
        Some(json!({ "type": "language", "value": "French" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let generation = body["data"]["generation"].as_u64().unwrap();
    let view = wait_for_generation(&app, &session_id, generation).await;
    assert_eq!(names(&view["outcome"]["results"]), vec!["James Wilson"]);
    assert!(view["criteria"]["languages"].as_array().unwrap().is_empty());

    let (_, body) = send(&app, Method::POST, &format!("/api/sessions/{}/reset", session_id), None).await;
    assert_eq!(body["data"]["outcome"]["total"], 5);
    assert_eq!(body["data"]["hasActiveFilters"], false);
    assert_eq!(body["data"]["loading"], false);
}

#[tokio::test]
async fn test_session_latest_submission_wins() {
    let app = setup().await;
    let (_, body) = send(&app, Method::POST, "/api/sessions", None).await;
    let session_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sessions/{}/criteria", session_id);

    send(&app, Method::PUT, &uri, Some(json!({ "languages": ["Hindi"] }))).await;
    let (_, body) = send(&app, Method::PUT, &uri, Some(json!({ "sortKey": "rating" }))).await;
    assert_eq!(body["data"]["generation"], 2);

    let view = wait_for_generation(&app, &session_id, 2).await;
    assert_eq!(view["outcome"]["total"], 5);
    assert_eq!(names(&view["outcome"]["results"])[0], "Marcus Chen");
}

#[tokio::test]
async fn test_comparison_selection() {
    let app = setup().await;
    let (_, body) = send(&app, Method::POST, "/api/sessions", None).await;
    let session_id = body["data"]["id"].as_str().unwrap().to_string();

    let mut last = Value::Null;
    for id in [MARCUS, EMMA, SOPHIA, JAMES] {
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/sessions/{}/selection/{}", session_id, id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = body["data"].clone();
    }
    assert_eq!(last["change"], "ignored");
    assert_eq!(last["selection"], json!([MARCUS, EMMA, SOPHIA]));
    assert_eq!(last["canCompare"], true);

    let (_, body) = send(&app, Method::GET, &format!("/api/sessions/{}/compare", session_id), None).await;
    assert_eq!(
        names(&body["data"]),
        vec!["Marcus Chen", "Emma Johnson", "Sophia Rodriguez"]
    );

    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/selection/{}", session_id, EMMA),
        None,
    )
    .await;
    assert_eq!(body["data"]["change"], "removed");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/selection/nobody", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recent_searches_and_session_lifecycle() {
    let app = setup().await;
    let (_, body) = send(&app, Method::POST, "/api/sessions", None).await;
    let session_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sessions/{}/criteria", session_id);

    for term in ["tutorial", "calm", "tutorial"] {
        send(&app, Method::PUT, &uri, Some(json!({ "freeTextTerm": term }))).await;
    }

    let recent_uri = format!("/api/sessions/{}/recent", session_id);
    let (_, body) = send(&app, Method::GET, &recent_uri, None).await;
    assert_eq!(body["data"], json!(["tutorial", "calm"]));

    send(&app, Method::DELETE, &recent_uri, None).await;
    let (_, body) = send(&app, Method::GET, &recent_uri, None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/quote",
        Some(json!({ "actorId": EMMA, "packageName": "Premium", "expressDelivery": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 475.0);
    assert_eq!(body["data"]["deliveryDays"], 1);
    assert_eq!(body["data"]["revisions"], Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "creatorId": "creator1",
            "actorId": EMMA,
            "packageName": "Standard",
            "projectTitle": "Launch video"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["price"], 250.0);
    assert_eq!(body["data"]["revisionsLeft"], 3);
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/orders/{}/status", order_id);

    let (status, body) = send(&app, Method::PUT, &status_uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "validation_error");

    send(&app, Method::PUT, &status_uri, Some(json!({ "status": "in-progress" }))).await;
    let (_, body) = send(
        &app,
        Method::PUT,
        &status_uri,
        Some(json!({ "status": "delivered", "videoUrl": "https://cdn.example.com/v1.mp4" })),
    )
    .await;
    assert_eq!(body["data"]["videoUrl"], "https://cdn.example.com/v1.mp4");

    let (_, body) = send(&app, Method::PUT, &status_uri, Some(json!({ "status": "revision" }))).await;
    assert_eq!(body["data"]["revisionsLeft"], 2);

    let (_, body) = send(&app, Method::GET, "/api/orders?creator_id=creator1", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/orders/quote",
        Some(json!({ "actorId": EMMA, "packageName": "Gold" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_and_profiles() {
    let app = setup().await;
    let signup = json!({
        "name": "Dana Creator",
        "email": "Dana@Example.com",
        "phone": "+14155550123",
        "password": "Str0ng!Pass",
        "confirmPassword": "Str0ng!Pass",
        "userType": "creator",
        "termsAccepted": true,
        "privacyAccepted": true
    });

    let (status, body) = send(&app, Method::POST, "/api/profiles", Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "dana@example.com");
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::POST, "/api/profiles", Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "conflict");

    let mut weak = signup.clone();
    weak["email"] = json!("other@example.com");
    weak["password"] = json!("weak");
    weak["confirmPassword"] = json!("weak");
    let (status, _) = send(&app, Method::POST, "/api/profiles", Some(weak)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/profiles/{}", profile_id),
        Some(json!({ "fullName": "Dana C." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullName"], "Dana C.");

    let (_, body) = send(&app, Method::GET, &format!("/api/profiles/{}", profile_id), None).await;
    assert_eq!(body["data"]["fullName"], "Dana C.");
}

#[tokio::test]
async fn test_conversations_and_messages() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/conversations",
        Some(json!({ "creatorId": "creator1", "actorId": "user1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let conversation_id = body["data"]["id"].as_str().unwrap().to_string();

    // 反向发起返回同一个会话
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/conversations",
        Some(json!({ "creatorId": "user1", "actorId": "creator1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], conversation_id.as_str());

    let messages_uri = format!("/api/conversations/{}/messages", conversation_id);
    let (status, _) = send(
        &app,
        Method::POST,
        &messages_uri,
        Some(json!({ "senderId": "stranger", "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &messages_uri,
        Some(json!({ "senderId": "creator1", "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::POST,
        &messages_uri,
        Some(json!({ "senderId": "creator1", "content": "  Hi Emma, are you free next week?  " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["content"], "Hi Emma, are you free next week?");

    let (_, body) = send(&app, Method::GET, &messages_uri, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/api/conversations/{}/read", conversation_id),
        Some(json!({ "readerId": "user1" })),
    )
    .await;
    assert_eq!(body["data"]["marked"], 1);

    let (_, body) = send(&app, Method::GET, "/api/conversations?user_id=user1", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/conversations",
        Some(json!({ "creatorId": "user1", "actorId": "user1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_actor_writes_refresh_catalog() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/actors",
        Some(json!({
            "name": "Lena Fischer",
            "tagline": "Warm German-language explainer videos",
            "languages": ["German", "English"],
            "videoTypes": ["Explainer"],
            "tones": ["Warm"],
            "basePrice": 90,
            "standardDeliveryTime": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let actor_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, Method::POST, "/api/search", Some(json!({ "languages": ["German"] }))).await;
    assert_eq!(names(&body["data"]["results"]), vec!["Lena Fischer"]);

    let reviews_uri = format!("/api/actors/{}/reviews", actor_id);
    for rating in [5.0, 4.0] {
        let (status, _) = send(
            &app,
            Method::POST,
            &reviews_uri,
            Some(json!({ "creatorId": "creator9", "creatorName": "Studio Nine", "rating": rating })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, body) = send(&app, Method::GET, &format!("/api/actors/{}", actor_id), None).await;
    assert_eq!(body["data"]["rating"], 4.5);
    assert_eq!(body["data"]["reviewCount"], 2);

    let (status, _) = send(
        &app,
        Method::POST,
        &reviews_uri,
        Some(json!({ "creatorId": "creator9", "creatorName": "Studio Nine", "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/actors/{}", actor_id),
        Some(json!({ "basePrice": 110 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["basePrice"], 110.0);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/actors/{}", actor_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::POST, "/api/search", Some(json!({ "languages": ["German"] }))).await;
    assert_eq!(body["data"]["total"], 0);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/actors/{}", actor_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_backed_database_seeds_once() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("faceup.db").display());

    let database = Database::connect(&url).await.unwrap();
    assert_eq!(seed::seed_fixtures(database.pool()).await.unwrap(), 5);
    assert_eq!(seed::seed_fixtures(database.pool()).await.unwrap(), 0);
    database.pool().close().await;

    let reopened = Database::connect(&url).await.unwrap();
    let stats = reopened.get_stats().await.unwrap();
    assert_eq!(stats.actor_count, 5);
    assert_eq!(stats.review_count, 3);
}

#[tokio::test]
async fn test_actor_numbers_are_bounded() {
    let app = setup().await;
    let base = json!({
        "name": "Lena Fischer",
        "languages": ["German"],
        "basePrice": 90,
        "standardDeliveryTime": 2
    });
    let with = |field: &str, value: Value| {
        let mut body = base.clone();
        body[field] = value;
        body
    };

    for (field, value) in [
        ("standardDeliveryTime", json!(2_000_000_000)),
        ("expressDeliveryTime", json!(500)),
        ("reviewCount", json!(-5)),
        ("completedOrders", json!(-1)),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/actors", Some(with(field, value))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} should be rejected", field);
    }

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/actors/{}", EMMA),
        Some(json!({ "standardDeliveryTime": 2_000_000_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, body) = send(&app, Method::POST, "/api/orders/quote", Some(json!({ "actorId": EMMA }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deliveryDays"], 3);

    // 评价数已在上限时追加评价不会溢出
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/actors",
        Some(with("reviewCount", json!(i32::MAX))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let actor_id = body["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/actors/{}/reviews", actor_id),
        Some(json!({ "creatorId": "creator9", "creatorName": "Studio Nine", "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = send(&app, Method::GET, &format!("/api/actors/{}", actor_id), None).await;
    assert_eq!(body["data"]["reviewCount"], i32::MAX);
}
