use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{NotificationEvaluator, PgNotificationStore};
use crate::ws::SubscriberRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: devpulse_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live alert subscribers.
    pub subscribers: Arc<SubscriberRegistry>,
    /// Rule evaluation run on every recorded heartbeat.
    pub evaluator: Arc<NotificationEvaluator>,
}

impl AppState {
    /// Wire the PostgreSQL-backed evaluator to the given registry.
    pub fn new(
        pool: devpulse_db::DbPool,
        config: ServerConfig,
        subscribers: Arc<SubscriberRegistry>,
    ) -> Self {
        let store = Arc::new(PgNotificationStore::new(pool.clone()));
        let evaluator = Arc::new(NotificationEvaluator::new(store, Arc::clone(&subscribers)));
        Self {
            pool,
            config: Arc::new(config),
            subscribers,
            evaluator,
        }
    }
}
