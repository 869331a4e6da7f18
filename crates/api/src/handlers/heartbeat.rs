//! Handlers for the `/heartbeat` resource: device intake and history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use devpulse_core::error::CoreError;
use devpulse_core::heartbeat::HeartbeatPayload;
use devpulse_core::types::{DbId, Timestamp};
use devpulse_db::models::heartbeat::Heartbeat;
use devpulse_db::repositories::{DeviceRepo, HeartbeatRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::devices::find_owned;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default history window when no `start_date` is given.
const DEFAULT_HISTORY_DAYS: i64 = 7;

/// Query parameters for heartbeat history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// POST /api/v1/heartbeat
///
/// Device-facing intake, unauthenticated; devices identify themselves by
/// serial number. Validation and the device lookup happen before anything is
/// written. Rule evaluation runs before the response is sent but never turns
/// a recorded heartbeat into an error: the producer only learns whether its
/// sample was stored.
pub async fn ingest_heartbeat(
    State(state): State<AppState>,
    Json(input): Json<HeartbeatPayload>,
) -> AppResult<(StatusCode, Json<DataResponse<Heartbeat>>)> {
    input.check()?;

    let device = DeviceRepo::find_by_sn(&state.pool, &input.device_sn)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::DeviceNotFound(input.device_sn.clone())))?;

    let heartbeat = HeartbeatRepo::create(&state.pool, device.id, &input).await?;

    let alerts = state.evaluator.evaluate(&heartbeat).await;

    tracing::debug!(
        heartbeat_id = heartbeat.id,
        device_id = device.id,
        alerts = alerts.len(),
        "Heartbeat recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: heartbeat })))
}

/// GET /api/v1/heartbeat/{device_id}/history?start_date=&end_date=
///
/// Heartbeats of an owned device inside the window, newest first. The window
/// defaults to the last seven days.
pub async fn heartbeat_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<Vec<Heartbeat>>>> {
    let (start, end) = history_window(&params, Utc::now())?;

    find_owned(&state, device_id, auth.user_id).await?;

    let heartbeats =
        HeartbeatRepo::list_for_device_between(&state.pool, device_id, start, end).await?;

    Ok(Json(DataResponse { data: heartbeats }))
}

fn history_window(params: &HistoryParams, now: Timestamp) -> Result<(Timestamp, Timestamp), CoreError> {
    let end = params.end_date.unwrap_or(now);
    let start = params
        .start_date
        .unwrap_or(end - Duration::days(DEFAULT_HISTORY_DAYS));
    if start > end {
        return Err(CoreError::Validation(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok((start, end))
}
