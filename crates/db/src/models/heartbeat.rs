//! Heartbeat entity model (append-only).

use devpulse_core::heartbeat::MetricReadings;
use devpulse_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A stored telemetry sample. `created_at` is the server arrival time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Heartbeat {
    pub id: DbId,
    pub device_id: DbId,
    pub cpu_usage: f64,
    pub ram_usage: f64,
    pub disk_free: f64,
    pub temperature: f64,
    pub dns_latency: f64,
    pub connectivity: i32,
    pub boot_time: Timestamp,
    pub created_at: Timestamp,
}

impl Heartbeat {
    pub fn readings(&self) -> MetricReadings {
        MetricReadings {
            cpu_usage: self.cpu_usage,
            ram_usage: self.ram_usage,
            disk_free: self.disk_free,
            temperature: self.temperature,
            dns_latency: self.dns_latency,
            connectivity: self.connectivity,
        }
    }
}
