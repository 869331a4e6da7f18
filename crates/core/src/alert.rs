//! Real-time alert event pushed to live subscribers.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// `type` discriminator of alert notification events.
pub const EVENT_TYPE_NOTIFICATION: &str = "notification";

/// Envelope sent over the alert WebSocket:
/// `{"type": "notification", "alert": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub alert: AlertPayload,
}

/// A persisted alert, enriched with the device and rule context a client
/// needs to display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub id: DbId,
    pub message: String,
    pub device_name: String,
    pub metric: String,
    /// The observed metric value that triggered the alert.
    pub value: f64,
    pub threshold: f64,
    pub created_at: Timestamp,
}

impl AlertEvent {
    pub fn notification(alert: AlertPayload) -> Self {
        Self {
            event_type: EVENT_TYPE_NOTIFICATION.to_string(),
            alert,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
