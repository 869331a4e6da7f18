//! Repository for the `notification_rules` table.

use devpulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::rule::{CreateRule, NotificationRule, UpdateRule};

/// Column list for `notification_rules` queries.
const COLUMNS: &str = "\
    id, user_id, name, metric, condition, threshold, device_ids, \
    is_active, created_at, updated_at";

/// Provides CRUD operations for notification rules.
pub struct RuleRepo;

impl RuleRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateRule,
    ) -> Result<NotificationRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_rules \
                (user_id, name, metric, condition, threshold, device_ids, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationRule>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.metric)
            .bind(&input.condition)
            .bind(input.threshold)
            .bind(&input.device_ids)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// All rules of a user, active or not, in creation order.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<NotificationRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_rules \
             WHERE user_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, NotificationRule>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Active rules of an owner in creation order.
    ///
    /// This is the rule snapshot a heartbeat is evaluated against; the order
    /// is stable so alerts are produced deterministically.
    pub async fn list_active_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<NotificationRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_rules \
             WHERE user_id = $1 AND is_active = true \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, NotificationRule>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<NotificationRule>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM notification_rules WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, NotificationRule>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a rule. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists for `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateRule,
    ) -> Result<Option<NotificationRule>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_rules SET \
                name = COALESCE($3, name), \
                metric = COALESCE($4, metric), \
                condition = COALESCE($5, condition), \
                threshold = COALESCE($6, threshold), \
                device_ids = COALESCE($7, device_ids), \
                is_active = COALESCE($8, is_active), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationRule>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.metric)
            .bind(&input.condition)
            .bind(input.threshold)
            .bind(&input.device_ids)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a rule. Its alerts are kept with `rule_id` cleared.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notification_rules WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
