//! Rule evaluation for freshly recorded heartbeats.
//!
//! [`NotificationEvaluator::evaluate`] runs inline with heartbeat intake:
//! it loads the device owner's active rules, matches them with
//! [`devpulse_core::rules::check_rule`], persists one alert per trigger and
//! hands each alert to the [`SubscriberRegistry`]. Nothing in here fails the
//! intake request. Problems with one rule or one alert are logged and the
//! remaining rules are still evaluated.

use std::sync::Arc;

use async_trait::async_trait;
use devpulse_core::alert::{AlertEvent, AlertPayload};
use devpulse_core::rules::{check_rule, render_alert_message, RuleOutcome, Trigger};
use devpulse_core::types::DbId;
use devpulse_db::models::alert::{Alert, CreateAlert};
use devpulse_db::models::heartbeat::Heartbeat;
use devpulse_db::models::rule::NotificationRule;
use devpulse_db::repositories::{AlertRepo, DeviceRepo, RuleRepo};
use devpulse_db::DbPool;

use crate::ws::SubscriberRegistry;

/// The device a heartbeat belongs to, with what alerts need to know about it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOwner {
    pub device_id: DbId,
    pub device_name: String,
    pub owner_id: DbId,
}

/// Persistence the evaluator depends on.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Resolve a device and its owner. `None` if the device no longer exists.
    async fn resolve_device(&self, device_id: DbId) -> Result<Option<DeviceOwner>, sqlx::Error>;

    /// Active rules of an owner in a stable order (creation time, then id).
    async fn list_active_rules_for_owner(
        &self,
        owner_id: DbId,
    ) -> Result<Vec<NotificationRule>, sqlx::Error>;

    /// Append one alert and return the stored row.
    async fn append_alert(&self, alert: &CreateAlert) -> Result<Alert, sqlx::Error>;
}

/// [`NotificationStore`] backed by the PostgreSQL repositories.
pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn resolve_device(&self, device_id: DbId) -> Result<Option<DeviceOwner>, sqlx::Error> {
        let device = DeviceRepo::find_by_id(&self.pool, device_id).await?;
        Ok(device.map(|d| DeviceOwner {
            device_id: d.id,
            device_name: d.name,
            owner_id: d.user_id,
        }))
    }

    async fn list_active_rules_for_owner(
        &self,
        owner_id: DbId,
    ) -> Result<Vec<NotificationRule>, sqlx::Error> {
        RuleRepo::list_active_for_owner(&self.pool, owner_id).await
    }

    async fn append_alert(&self, alert: &CreateAlert) -> Result<Alert, sqlx::Error> {
        AlertRepo::create(&self.pool, alert).await
    }
}

/// Matches heartbeats against rules and fans the resulting alerts out.
pub struct NotificationEvaluator {
    store: Arc<dyn NotificationStore>,
    subscribers: Arc<SubscriberRegistry>,
}

impl NotificationEvaluator {
    pub fn new(store: Arc<dyn NotificationStore>, subscribers: Arc<SubscriberRegistry>) -> Self {
        Self { store, subscribers }
    }

    /// Evaluate one recorded heartbeat against its owner's active rules.
    ///
    /// Returns the alerts created, in rule order. A device that disappeared
    /// since intake, or a failure to load rules, yields an empty list.
    pub async fn evaluate(&self, heartbeat: &Heartbeat) -> Vec<Alert> {
        let device = match self.store.resolve_device(heartbeat.device_id).await {
            Ok(Some(device)) => device,
            Ok(None) => {
                tracing::debug!(
                    device_id = heartbeat.device_id,
                    "Device removed before evaluation, skipping",
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(device_id = heartbeat.device_id, error = %e, "Failed to resolve device");
                return Vec::new();
            }
        };

        let rules = match self.store.list_active_rules_for_owner(device.owner_id).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!(owner_id = device.owner_id, error = %e, "Failed to load rules");
                return Vec::new();
            }
        };

        let readings = heartbeat.readings();
        let mut created = Vec::new();

        for rule in &rules {
            let trigger = match check_rule(&rule.as_threshold_rule(), heartbeat.device_id, &readings) {
                RuleOutcome::Triggered(trigger) => trigger,
                RuleOutcome::NotTriggered => continue,
                RuleOutcome::Skipped(reason) => {
                    tracing::debug!(rule_id = rule.id, ?reason, "Rule skipped");
                    continue;
                }
            };

            let input = CreateAlert {
                rule_id: rule.id,
                user_id: device.owner_id,
                device_id: heartbeat.device_id,
                message: render_alert_message(
                    &device.device_name,
                    trigger.metric,
                    trigger.value,
                    trigger.threshold,
                ),
                value: trigger.value,
            };

            match self.store.append_alert(&input).await {
                Ok(alert) => {
                    tracing::info!(
                        alert_id = alert.id,
                        rule_id = rule.id,
                        device_id = heartbeat.device_id,
                        metric = %trigger.metric,
                        value = trigger.value,
                        "Alert created",
                    );
                    self.publish(&alert, &device, &trigger).await;
                    created.push(alert);
                }
                Err(e) => {
                    tracing::error!(rule_id = rule.id, error = %e, "Failed to persist alert");
                }
            }
        }

        created
    }

    async fn publish(&self, alert: &Alert, device: &DeviceOwner, trigger: &Trigger) {
        let event = AlertEvent::notification(AlertPayload {
            id: alert.id,
            message: alert.message.clone(),
            device_name: device.device_name.clone(),
            metric: trigger.metric.to_string(),
            value: alert.value,
            threshold: trigger.threshold,
            created_at: alert.created_at,
        });

        match self.subscribers.broadcast_event(&event).await {
            Ok(report) => tracing::debug!(
                alert_id = alert.id,
                delivered = report.delivered,
                failed = report.failed,
                "Alert broadcast",
            ),
            Err(e) => tracing::error!(alert_id = alert.id, error = %e, "Failed to serialize alert"),
        }
    }
}
