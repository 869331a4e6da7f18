//! Route definitions for the `/devices` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Routes mounted at `/devices`.
///
/// ```text
/// GET, POST          /
/// GET, PUT, DELETE   /{id}
/// GET                /{id}/heartbeats/latest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list_devices).post(devices::create_device))
        .route(
            "/{id}",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route("/{id}/heartbeats/latest", get(devices::latest_heartbeat))
}
