//! Alert entity model (append-only).

use devpulse_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notification_alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    /// `None` once the rule that produced the alert has been deleted.
    pub rule_id: Option<DbId>,
    pub user_id: DbId,
    pub device_id: DbId,
    pub message: String,
    pub value: f64,
    pub created_at: Timestamp,
}

/// DTO for appending an alert.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub rule_id: DbId,
    pub user_id: DbId,
    pub device_id: DbId,
    pub message: String,
    pub value: f64,
}
