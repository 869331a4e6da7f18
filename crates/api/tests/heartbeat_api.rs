//! HTTP-level integration tests for heartbeat intake, inline rule evaluation
//! and heartbeat history.

mod common;

use axum::extract::ws::Message;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, post_json};
use devpulse_core::alert::AlertEvent;
use devpulse_db::models::rule::CreateRule;
use devpulse_db::repositories::{AlertRepo, HeartbeatRepo, RuleRepo};
use sqlx::PgPool;

async fn heartbeat_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM heartbeats")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn cpu_rule(threshold: f64) -> CreateRule {
    CreateRule {
        name: "CPU hot".to_string(),
        metric: "cpu_usage".to_string(),
        condition: ">".to_string(),
        threshold,
        device_ids: vec![],
        is_active: true,
    }
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_heartbeat_is_recorded(pool: PgPool) {
    let (user, _) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Edge", "EDG000000001").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/heartbeat",
        common::heartbeat_json(&device.sn),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["id"].is_number());
    assert_eq!(json["data"]["device_id"], device.id);
    assert_eq!(json["data"]["cpu_usage"], 35.0);
    assert!(json["data"]["created_at"].is_string());
    assert_eq!(heartbeat_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_serial_returns_404_and_persists_nothing(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/heartbeat",
        common::heartbeat_json("UNKNOWN00000"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    assert_eq!(heartbeat_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_fields_are_rejected_before_persistence(pool: PgPool) {
    let (user, _) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Edge", "EDG000000001").await;

    let cases = [
        ("cpu_usage", serde_json::json!(101.0)),
        ("ram_usage", serde_json::json!(-1.0)),
        ("disk_free", serde_json::json!(100.5)),
        ("dns_latency", serde_json::json!(-0.5)),
        ("connectivity", serde_json::json!(2)),
    ];

    for (field, value) in cases {
        let mut body = common::heartbeat_json(&device.sn);
        body[field] = value;
        let response = post_json(common::build_test_app(pool.clone()), "/api/v1/heartbeat", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["error"].as_str().unwrap().contains(field), "{json}");
    }

    assert_eq!(heartbeat_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn triggered_rule_creates_and_broadcasts_alert(pool: PgPool) {
    let (user, _) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Server Room Sensor", "SRV001234567").await;
    let rule = RuleRepo::create(&pool, user.id, &cpu_rule(90.0)).await.unwrap();

    let (app, subscribers) = common::build_test_app_with_subscribers(pool.clone());
    let mut rx = subscribers.register("watcher".to_string()).await;

    let mut body = common::heartbeat_json(&device.sn);
    body["cpu_usage"] = serde_json::json!(95.0);
    let response = post_json(app, "/api/v1/heartbeat", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Evaluation finished before the response was sent.
    let alerts = AlertRepo::list_for_rule(&pool, rule.id).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].value, 95.0);
    assert_eq!(alerts[0].device_id, device.id);
    assert_eq!(
        alerts[0].message,
        "Device Server Room Sensor - cpu_usage is 95 (threshold: 90)"
    );

    let Ok(Message::Text(frame)) = rx.try_recv() else {
        panic!("alert should already be queued for the subscriber");
    };
    let event: AlertEvent = serde_json::from_str(frame.as_str()).unwrap();
    assert_eq!(event.event_type, "notification");
    assert_eq!(event.alert.id, alerts[0].id);
    assert_eq!(event.alert.device_name, "Server Room Sensor");
    assert_eq!(event.alert.threshold, 90.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn producer_response_does_not_reveal_alerts(pool: PgPool) {
    let (user, _) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Edge", "EDG000000001").await;
    RuleRepo::create(&pool, user.id, &cpu_rule(10.0)).await.unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/heartbeat",
        common::heartbeat_json(&device.sn),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"].get("alerts").is_none());
    assert_eq!(AlertRepo::list_for_user(&pool, user.id, 10).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_returns_owned_heartbeats_newest_first(pool: PgPool) {
    let (user, token) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Edge", "EDG000000001").await;

    for cpu in [10.0, 20.0] {
        let mut body = common::heartbeat_json(&device.sn);
        body["cpu_usage"] = serde_json::json!(cpu);
        post_json(common::build_test_app(pool.clone()), "/api/v1/heartbeat", body).await;
    }

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/heartbeat/{}/history", device.id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let cpus: Vec<f64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["cpu_usage"].as_f64().unwrap())
        .collect();
    assert_eq!(cpus, vec![20.0, 10.0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_window_excludes_older_samples(pool: PgPool) {
    let (user, token) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Edge", "EDG000000001").await;
    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/heartbeat",
        common::heartbeat_json(&device.sn),
    )
    .await;

    let end = (Utc::now() - Duration::days(1)).format("%Y-%m-%dT%H:%M:%SZ");
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/heartbeat/{}/history?end_date={end}", device.id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_of_foreign_device_is_not_found(pool: PgPool) {
    let (alice, _) = common::create_user_with_token(&pool, "alice@example.com").await;
    let (_bob, bob_token) = common::create_user_with_token(&pool, "bob@example.com").await;
    let device = common::create_device(&pool, &alice, "Edge", "EDG000000001").await;

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/heartbeat/{}/history", device.id),
        &bob_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn latest_heartbeat_endpoint(pool: PgPool) {
    let (user, token) = common::create_user_with_token(&pool, "ops@example.com").await;
    let device = common::create_device(&pool, &user, "Edge", "EDG000000001").await;
    let uri = format!("/api/v1/devices/{}/heartbeats/latest", device.id);

    let response = get_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/heartbeat",
        common::heartbeat_json(&device.sn),
    )
    .await;
    let stored = HeartbeatRepo::latest_for_device(&pool, device.id)
        .await
        .unwrap()
        .unwrap();

    let response = get_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], stored.id);
}
