//! Route definitions for the `/heartbeat` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::heartbeat;
use crate::state::AppState;

/// Routes mounted at `/heartbeat`.
///
/// ```text
/// POST /                         -> ingest_heartbeat (public)
/// GET  /{device_id}/history      -> heartbeat_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(heartbeat::ingest_heartbeat))
        .route("/{device_id}/history", get(heartbeat::heartbeat_history))
}
