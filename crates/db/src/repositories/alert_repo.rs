//! Repository for the `notification_alerts` table (append-only).

use devpulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{Alert, CreateAlert};

/// Column list for `notification_alerts` queries.
const COLUMNS: &str = "id, rule_id, user_id, device_id, message, value, created_at";

/// Provides append and listing for alerts. Alerts are never updated.
pub struct AlertRepo;

impl AlertRepo {
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_alerts (rule_id, user_id, device_id, message, value) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.rule_id)
            .bind(input.user_id)
            .bind(input.device_id)
            .bind(&input.message)
            .bind(input.value)
            .fetch_one(pool)
            .await
    }

    /// A user's most recent alerts, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_alerts \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// All alerts produced by one rule, oldest first.
    pub async fn list_for_rule(pool: &PgPool, rule_id: DbId) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_alerts \
             WHERE rule_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(rule_id)
            .fetch_all(pool)
            .await
    }
}
