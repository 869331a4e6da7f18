#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use devpulse_api::auth::jwt::{generate_access_token, JwtConfig};
use devpulse_api::config::{BroadcastConfig, ServerConfig};
use devpulse_api::router::build_app_router;
use devpulse_api::state::AppState;
use devpulse_api::ws::SubscriberRegistry;
use devpulse_core::heartbeat::HeartbeatPayload;
use devpulse_db::models::device::{CreateDevice, Device};
use devpulse_db::models::user::{CreateUser, User};
use devpulse_db::repositories::{DeviceRepo, UserRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 30,
        },
        broadcast: BroadcastConfig::default(),
    }
}

/// Build the full application router, using the given database pool.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_subscribers(pool).0
}

/// Like [`build_test_app`], but also returns the subscriber registry so tests
/// can observe alert broadcasts.
pub fn build_test_app_with_subscribers(pool: PgPool) -> (Router, Arc<SubscriberRegistry>) {
    let config = test_config();
    let subscribers = Arc::new(SubscriberRegistry::new(&config.broadcast));
    let state = AppState::new(pool, config.clone(), Arc::clone(&subscribers));
    (build_app_router(state, &config), subscribers)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and return it with a valid bearer token.
pub async fn create_user_with_token(pool: &PgPool, email: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test Operator".to_string(),
            password_hash: "unused-in-token-tests".to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = generate_access_token(user.id, &test_config().jwt).expect("token should encode");
    (user, token)
}

pub async fn create_device(pool: &PgPool, user: &User, name: &str, sn: &str) -> Device {
    DeviceRepo::create(
        pool,
        user.id,
        &CreateDevice {
            name: name.to_string(),
            location: "Server Room".to_string(),
            sn: sn.to_string(),
            description: None,
        },
    )
    .await
    .expect("device creation should succeed")
}

/// A heartbeat that triggers nothing unless a test raises a value.
pub fn heartbeat_json(sn: &str) -> serde_json::Value {
    serde_json::to_value(HeartbeatPayload {
        device_sn: sn.to_string(),
        cpu_usage: 35.0,
        ram_usage: 48.0,
        disk_free: 72.0,
        temperature: 45.5,
        dns_latency: 9.0,
        connectivity: 1,
        boot_time: Utc::now() - chrono::Duration::hours(6),
    })
    .expect("payload should serialize")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Read the full response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
