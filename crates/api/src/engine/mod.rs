//! Notification engine: turns recorded heartbeats into alerts.

pub mod evaluator;

pub use evaluator::{DeviceOwner, NotificationEvaluator, NotificationStore, PgNotificationStore};
