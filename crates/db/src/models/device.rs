//! Device entity model and DTOs.

use devpulse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub location: String,
    /// External identifier used by the device when it reports heartbeats.
    pub sn: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a device.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub name: String,
    pub location: String,
    pub sn: String,
    pub description: Option<String>,
}

/// DTO for updating a device. The serial number cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDevice {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}
