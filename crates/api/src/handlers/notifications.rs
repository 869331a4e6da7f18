//! Handlers for the `/notifications` resource: threshold rules and alerts.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use devpulse_core::error::CoreError;
use devpulse_core::types::DbId;
use devpulse_core::validation::{
    validate_comparator, validate_metric_name, validate_required, validate_threshold,
};
use devpulse_db::models::alert::Alert;
use devpulse_db::models::rule::{CreateRule, NotificationRule, UpdateRule};
use devpulse_db::repositories::{AlertRepo, DeviceRepo, RuleRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of alerts returned by the alert listing.
const DEFAULT_ALERT_LIMIT: i64 = 100;

/// Upper bound on the alert listing page size.
const MAX_ALERT_LIMIT: i64 = 500;

/// Query parameters for `GET /notifications/alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertListParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// All rules of the caller, active or not, oldest first.
pub async fn list_rules(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NotificationRule>>>> {
    let rules = RuleRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// POST /api/v1/notifications
///
/// Create a rule. The metric must be a known heartbeat field, the condition
/// one of `>`, `<`, `>=`, `<=`, `==`, and any scoped devices must belong to
/// the caller.
pub async fn create_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRule>,
) -> AppResult<(StatusCode, Json<DataResponse<NotificationRule>>)> {
    validate_required(&input.name, "name")?;
    validate_metric_name(&input.metric)?;
    validate_comparator(&input.condition)?;
    validate_threshold(input.threshold)?;
    ensure_devices_owned(&state, auth.user_id, &input.device_ids).await?;

    let rule = RuleRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        rule_id = rule.id,
        user_id = auth.user_id,
        metric = %rule.metric,
        condition = %rule.condition,
        threshold = rule.threshold,
        "Notification rule created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// PUT /api/v1/notifications/{id}
///
/// Partial update; omitted fields keep their value. Setting `is_active` to
/// false stops future alerts without touching existing ones.
pub async fn update_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rule_id): Path<DbId>,
    Json(input): Json<UpdateRule>,
) -> AppResult<Json<DataResponse<NotificationRule>>> {
    if let Some(name) = &input.name {
        validate_required(name, "name")?;
    }
    if let Some(metric) = &input.metric {
        validate_metric_name(metric)?;
    }
    if let Some(condition) = &input.condition {
        validate_comparator(condition)?;
    }
    if let Some(threshold) = input.threshold {
        validate_threshold(threshold)?;
    }
    if let Some(device_ids) = &input.device_ids {
        ensure_devices_owned(&state, auth.user_id, device_ids).await?;
    }

    let rule = RuleRepo::update(&state.pool, rule_id, auth.user_id, &input)
        .await?
        .ok_or(rule_not_found(rule_id))?;

    tracing::info!(rule_id, user_id = auth.user_id, "Notification rule updated");

    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/notifications/{id}
///
/// Hard delete. Alerts already produced by the rule are kept.
pub async fn delete_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rule_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !RuleRepo::delete(&state.pool, rule_id, auth.user_id).await? {
        return Err(rule_not_found(rule_id));
    }

    tracing::info!(rule_id, user_id = auth.user_id, "Notification rule deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/alerts?limit=
///
/// The caller's most recent alerts, newest first.
pub async fn list_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AlertListParams>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let limit = clamp_limit(params.limit);
    let alerts = AlertRepo::list_for_user(&state.pool, auth.user_id, limit).await?;
    Ok(Json(DataResponse { data: alerts }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_ALERT_LIMIT).clamp(1, MAX_ALERT_LIMIT)
}

/// Reject device scopes that name devices the caller does not own.
async fn ensure_devices_owned(
    state: &AppState,
    user_id: DbId,
    device_ids: &[DbId],
) -> AppResult<()> {
    if device_ids.is_empty() {
        return Ok(());
    }

    let owned: HashSet<DbId> = DeviceRepo::list_for_user(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|d| d.id)
        .collect();

    match device_ids.iter().find(|id| !owned.contains(id)) {
        Some(unknown) => Err(AppError::Core(CoreError::Validation(format!(
            "device_ids: device {unknown} does not exist"
        )))),
        None => Ok(()),
    }
}

fn rule_not_found(rule_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "NotificationRule",
        id: rule_id,
    })
}
