//! Repository for the `heartbeats` table (append-only).

use devpulse_core::heartbeat::HeartbeatPayload;
use devpulse_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::heartbeat::Heartbeat;

/// Column list for `heartbeats` queries.
const COLUMNS: &str = "\
    id, device_id, cpu_usage, ram_usage, disk_free, temperature, \
    dns_latency, connectivity, boot_time, created_at";

/// Provides insert and history queries for heartbeats.
pub struct HeartbeatRepo;

impl HeartbeatRepo {
    /// Record one sample for `device_id`. The arrival time is assigned by the
    /// database.
    pub async fn create(
        pool: &PgPool,
        device_id: DbId,
        input: &HeartbeatPayload,
    ) -> Result<Heartbeat, sqlx::Error> {
        let query = format!(
            "INSERT INTO heartbeats \
                (device_id, cpu_usage, ram_usage, disk_free, temperature, \
                 dns_latency, connectivity, boot_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Heartbeat>(&query)
            .bind(device_id)
            .bind(input.cpu_usage)
            .bind(input.ram_usage)
            .bind(input.disk_free)
            .bind(input.temperature)
            .bind(input.dns_latency)
            .bind(input.connectivity)
            .bind(input.boot_time)
            .fetch_one(pool)
            .await
    }

    /// Heartbeats that arrived within `[start, end]`, newest first.
    pub async fn list_for_device_between(
        pool: &PgPool,
        device_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Heartbeat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM heartbeats \
             WHERE device_id = $1 AND created_at >= $2 AND created_at <= $3 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Heartbeat>(&query)
            .bind(device_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// The most recently arrived heartbeat of a device.
    pub async fn latest_for_device(
        pool: &PgPool,
        device_id: DbId,
    ) -> Result<Option<Heartbeat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM heartbeats \
             WHERE device_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Heartbeat>(&query)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }
}
