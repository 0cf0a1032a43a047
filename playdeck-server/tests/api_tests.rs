//! End-to-end API tests against the router with in-memory storage.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use playdeck_auth::{AuthConfig, AuthService, InMemoryUserRepository, Role, UserRepository};
use playdeck_scores::{InMemoryScoreRepository, ScoreService};
use playdeck_server::{create_app, PlaydeckServer, ServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, Arc<InMemoryUserRepository>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let config = AuthConfig {
        jwt_secret: "test-secret".to_string(),
        token_ttl_hours: 1,
        bcrypt_cost: 4, // bcrypt minimum, keeps the suite fast
        ..AuthConfig::default()
    };
    let auth = Arc::new(AuthService::new(users.clone(), &config));
    let scores = Arc::new(ScoreService::new(Arc::new(InMemoryScoreRepository::new())));

    let server = PlaydeckServer::new(ServerConfig::default(), auth, scores);
    (create_app(server), users)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Register an account and return `(user_id, token)`.
async fn register(app: &Router, email: &str, secret: &str) -> (Uuid, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Test User", "email": email, "secret": secret})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let user_id = body["data"]["user"]["id"].as_str().unwrap().parse().unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (user_id, token)
}

async fn login(app: &Router, email: &str, secret: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "secret": secret})),
    )
    .await
}

#[tokio::test]
async fn test_register_returns_profile_and_token() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Alice", "email": "alice@example.com", "secret": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("salt").is_none());
    assert!(body["data"]["user"].get("credentials").is_none());
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_rejects_short_secret() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Alice", "email": "alice@example.com", "secret": "abc"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_register_rejects_missing_fields() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "", "email": "alice@example.com", "secret": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (app, _) = test_app();
    register(&app, "alice@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Alice 2", "email": "alice@example.com", "secret": "secret2"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");
}

#[tokio::test]
async fn test_login_reports_matched_scheme() {
    let (app, _) = test_app();
    register(&app, "alice@example.com", "secret1").await;

    let (status, body) = login(&app, "alice@example.com", "secret1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["matched_scheme"], "classic");
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_login_failure_is_uniform() {
    let (app, _) = test_app();
    register(&app, "alice@example.com", "secret1").await;

    let (wrong_status, wrong_body) = login(&app, "alice@example.com", "not-it").await;
    let (unknown_status, unknown_body) = login(&app, "ghost@example.com", "whatever").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error_type"], unknown_body["error_type"]);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let (app, _) = test_app();
    let (_, token) = register(&app, "alice@example.com", "secret1").await;

    // no token
    let (status, _) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // garbage token
    let (status, _) = send(&app, "GET", "/api/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // valid token
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_credential_update_and_multi_scheme_login() {
    let (app, _) = test_app();
    let (_, token) = register(&app, "alice@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/credentials/pattern",
        Some(&token),
        Some(json!({"secret": "13572468"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "added");

    // overwrite reports "updated"
    let (_, body) = send(
        &app,
        "PUT",
        "/api/auth/credentials/pattern",
        Some(&token),
        Some(json!({"secret": "13572468"})),
    )
    .await;
    assert_eq!(body["data"]["status"], "updated");

    let (_, body) = login(&app, "alice@example.com", "13572468").await;
    assert_eq!(body["data"]["matched_scheme"], "pattern");

    let (_, body) = login(&app, "alice@example.com", "secret1").await;
    assert_eq!(body["data"]["matched_scheme"], "classic");

    let (status, _) = login(&app, "alice@example.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_credential_update_requires_token() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/credentials/pattern",
        None,
        Some(json!({"secret": "13572468"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_user_is_admin_only() {
    let (app, users) = test_app();
    let (admin_id, _) = register(&app, "admin@example.com", "secret1").await;
    let (victim_id, victim_token) = register(&app, "victim@example.com", "secret1").await;

    // promote, then log in again so the token carries the admin role
    users
        .update_profile(admin_id, None, Some(Role::Admin))
        .await
        .unwrap();
    let (_, body) = login(&app, "admin@example.com", "secret1").await;
    let admin_token = body["data"]["token"].as_str().unwrap().to_string();

    // plain user is refused
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{admin_id}"),
        Some(&victim_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // admin succeeds
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{victim_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/users/{victim_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_allows_moderator_or_admin() {
    let (app, users) = test_app();
    let (mod_id, _) = register(&app, "mod@example.com", "secret1").await;
    let (target_id, target_token) = register(&app, "target@example.com", "secret1").await;

    users
        .update_profile(mod_id, None, Some(Role::Moderator))
        .await
        .unwrap();
    let (_, body) = login(&app, "mod@example.com", "secret1").await;
    let mod_token = body["data"]["token"].as_str().unwrap().to_string();

    // plain user is refused
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{mod_id}"),
        Some(&target_token),
        Some(json!({"name": "Hacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // moderator succeeds
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{target_id}"),
        Some(&mod_token),
        Some(json!({"name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
}

#[tokio::test]
async fn test_list_users_requires_authentication() {
    let (app, _) = test_app();
    let (_, token) = register(&app, "alice@example.com", "secret1").await;

    let (status, _) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_score_submission_and_listing() {
    let (app, _) = test_app();
    let (user_id, _) = register(&app, "alice@example.com", "secret1").await;

    for (game, score) in [("snake", 50), ("snake", 200), ("laser", 120)] {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/scores/{user_id}"),
            None,
            Some(json!({"score": score, "game_type": game})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", &format!("/api/scores/{user_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["score"].as_i64().unwrap())
        .collect();
    assert_eq!(values, vec![200, 120, 50]);

    let (_, body) = send(&app, "GET", "/api/scores", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_score_submission_validation() {
    let (app, _) = test_app();
    let (user_id, _) = register(&app, "alice@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/scores/{user_id}"),
        None,
        Some(json!({"score": 10, "game_type": "tetris"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/scores/{user_id}"),
        None,
        Some(json!({"score": -5, "game_type": "snake"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_service_banner() {
    let (app, _) = test_app();

    let (status, body) = send(&app, "GET", "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Playdeck API");
    assert_eq!(body["endpoints"]["auth"], "/api/auth");
}
