//! Notification rule entity model and DTOs.

use devpulse_core::rules::ThresholdRule;
use devpulse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notification_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationRule {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    /// Heartbeat field name, e.g. `cpu_usage`.
    pub metric: String,
    /// One of `>`, `<`, `>=`, `<=`, `==`.
    pub condition: String,
    pub threshold: f64,
    /// Empty means the rule watches every device of the owner.
    pub device_ids: Vec<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NotificationRule {
    pub fn as_threshold_rule(&self) -> ThresholdRule<'_> {
        ThresholdRule {
            id: self.id,
            metric: &self.metric,
            condition: &self.condition,
            threshold: self.threshold,
            device_ids: &self.device_ids,
            is_active: self.is_active,
        }
    }
}

/// DTO for creating a rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRule {
    pub name: String,
    pub metric: String,
    pub condition: String,
    pub threshold: f64,
    #[serde(default)]
    pub device_ids: Vec<DbId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// DTO for updating a rule. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRule {
    pub name: Option<String>,
    pub metric: Option<String>,
    pub condition: Option<String>,
    pub threshold: Option<f64>,
    pub device_ids: Option<Vec<DbId>>,
    pub is_active: Option<bool>,
}
