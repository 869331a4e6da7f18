pub mod auth;
pub mod devices;
pub mod health;
pub mod heartbeat;
pub mod notifications;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /devices                                         list, create
/// /devices/{id}                                    get, update, delete
/// /devices/{id}/heartbeats/latest                  latest heartbeat
///
/// /heartbeat                                       intake (public, device-facing)
/// /heartbeat/{device_id}/history                   history window
///
/// /notifications                                   list, create rules
/// /notifications/{id}                              update, delete rule
/// /notifications/alerts                            recent alerts
/// /notifications/ws                                live alert stream (WebSocket)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/devices", devices::router())
        .nest("/heartbeat", heartbeat::router())
        .nest("/notifications", notifications::router())
}
