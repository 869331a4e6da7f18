//! Repository for the `devices` table.
//!
//! Every owner-facing query filters on `user_id` so one user can never read
//! or modify another user's devices.

use devpulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::{CreateDevice, Device, UpdateDevice};

/// Column list for `devices` queries.
const COLUMNS: &str = "id, user_id, name, location, sn, description, created_at, updated_at";

/// Provides CRUD operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Register a device for `user_id`.
    ///
    /// A duplicate serial number fails with the `uq_devices_sn` constraint.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateDevice,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (user_id, name, location, sn, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.sn)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List a user's devices, oldest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Device>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a device by id, but only if it belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a device by id regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a device by its external serial number.
    pub async fn find_by_sn(pool: &PgPool, sn: &str) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE sn = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(sn)
            .fetch_optional(pool)
            .await
    }

    /// Update a device. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists for `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateDevice,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET
                name = COALESCE($3, name),
                location = COALESCE($4, location),
                description = COALESCE($5, description),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a device and, via cascade, its heartbeats and alerts.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
