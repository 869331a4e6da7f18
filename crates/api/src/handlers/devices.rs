//! Handlers for the `/devices` resource.
//!
//! Every endpoint is scoped to the authenticated owner: another owner's device
//! is reported as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devpulse_core::error::CoreError;
use devpulse_core::types::DbId;
use devpulse_core::validation::{validate_required, validate_serial_number};
use devpulse_db::models::device::{CreateDevice, Device, UpdateDevice};
use devpulse_db::models::heartbeat::Heartbeat;
use devpulse_db::repositories::{DeviceRepo, HeartbeatRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/devices
pub async fn list_devices(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Device>>>> {
    let devices = DeviceRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: devices }))
}

/// POST /api/v1/devices
///
/// Register a device. The serial number must be exactly 12 characters and
/// globally unique (409 otherwise).
pub async fn create_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDevice>,
) -> AppResult<(StatusCode, Json<DataResponse<Device>>)> {
    validate_required(&input.name, "name")?;
    validate_required(&input.location, "location")?;
    validate_serial_number(&input.sn)?;

    let device = DeviceRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(device_id = device.id, user_id = auth.user_id, sn = %device.sn, "Device registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// GET /api/v1/devices/{id}
pub async fn get_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Device>>> {
    let device = find_owned(&state, device_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: device }))
}

/// PUT /api/v1/devices/{id}
///
/// Update name, location or description. The serial number is immutable.
pub async fn update_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
    Json(input): Json<UpdateDevice>,
) -> AppResult<Json<DataResponse<Device>>> {
    if let Some(name) = &input.name {
        validate_required(name, "name")?;
    }
    if let Some(location) = &input.location {
        validate_required(location, "location")?;
    }

    let device = DeviceRepo::update(&state.pool, device_id, auth.user_id, &input)
        .await?
        .ok_or(not_found(device_id))?;

    tracing::info!(device_id, user_id = auth.user_id, "Device updated");

    Ok(Json(DataResponse { data: device }))
}

/// DELETE /api/v1/devices/{id}
///
/// Removes the device together with its heartbeats and alerts.
pub async fn delete_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DeviceRepo::delete(&state.pool, device_id, auth.user_id).await? {
        return Err(not_found(device_id));
    }

    tracing::info!(device_id, user_id = auth.user_id, "Device deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/devices/{id}/heartbeats/latest
pub async fn latest_heartbeat(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Heartbeat>>> {
    find_owned(&state, device_id, auth.user_id).await?;

    let heartbeat = HeartbeatRepo::latest_for_device(&state.pool, device_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Heartbeat",
            id: device_id,
        }))?;

    Ok(Json(DataResponse { data: heartbeat }))
}

/// Load a device owned by `user_id` or fail with 404.
pub(crate) async fn find_owned(
    state: &AppState,
    device_id: DbId,
    user_id: DbId,
) -> AppResult<Device> {
    DeviceRepo::find_for_user(&state.pool, device_id, user_id)
        .await?
        .ok_or(not_found(device_id))
}

fn not_found(device_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Device",
        id: device_id,
    })
}
