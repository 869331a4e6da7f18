use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ws::manager::SubscriberRegistry;

/// Spawn a background task that sends periodic Ping frames to all alert
/// subscribers until `cancel` fires.
pub fn start_heartbeat(
    registry: Arc<SubscriberRegistry>,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let report = registry.ping_all().await;
                    tracing::debug!(
                        delivered = report.delivered,
                        pruned = report.pruned.len(),
                        "Alert subscriber ping",
                    );
                }
            }
        }

        tracing::debug!("Alert subscriber heartbeat stopped");
    })
}
