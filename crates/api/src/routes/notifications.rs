//! Route definitions for the `/notifications` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET, POST      /          -> list_rules, create_rule
/// PUT, DELETE    /{id}      -> update_rule, delete_rule
/// GET            /alerts    -> list_alerts
/// GET            /ws        -> live alert stream
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::list_rules).post(notifications::create_rule),
        )
        .route("/alerts", get(notifications::list_alerts))
        .route("/ws", get(ws::ws_handler))
        .route(
            "/{id}",
            put(notifications::update_rule).delete(notifications::delete_rule),
        )
}
