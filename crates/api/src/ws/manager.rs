//! Process-wide registry of live alert subscribers.
//!
//! Every subscriber owns a bounded outbound queue drained by its socket
//! writer task. Broadcasting never awaits a socket: it hands the frame to each
//! queue with a non-blocking `try_send` while holding the read lock, so a slow
//! consumer cannot stall the heartbeat that produced the alert, and a
//! subscriber that has been unregistered (write lock) can never observe a
//! later event.
//!
//! Failed hand-offs are counted per subscriber. A closed queue (the socket
//! task is gone) or `max_delivery_failures` consecutive full-queue failures
//! remove the subscriber from the registry. Earlier versions of this service
//! swallowed send errors and kept dead connections registered forever; the
//! pruning here replaces that behaviour.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::body::Bytes;
use axum::extract::ws::Message;
use devpulse_core::alert::AlertEvent;
use devpulse_core::types::Timestamp;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

use crate::config::BroadcastConfig;

/// Receiver half handed to the socket writer of one subscriber.
pub type OutboundReceiver = mpsc::Receiver<Message>;

/// Why one subscriber did not accept a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The subscriber's socket task has exited.
    Closed,
    /// The subscriber's outbound queue is full. `consecutive` counts this
    /// failure and the ones immediately before it.
    QueueFull { consecutive: u32 },
}

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers whose queue accepted the frame.
    pub delivered: usize,
    /// Subscribers that did not accept the frame.
    pub failed: usize,
    /// Connection ids removed from the registry as a result.
    pub pruned: Vec<String>,
}

struct Subscriber {
    sender: mpsc::Sender<Message>,
    connected_at: Timestamp,
    consecutive_failures: AtomicU32,
}

impl Subscriber {
    fn offer(&self, message: Message) -> Result<(), DeliveryFailure> {
        match self.sender.try_send(message) {
            Ok(()) => {
                self.consecutive_failures.store(0, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                let consecutive = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                Err(DeliveryFailure::QueueFull { consecutive })
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryFailure::Closed),
        }
    }
}

/// Tracks every open alert stream connection.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared through `AppState`.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<String, Subscriber>>,
    channel_capacity: usize,
    max_delivery_failures: u32,
}

impl SubscriberRegistry {
    pub fn new(config: &BroadcastConfig) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            channel_capacity: config.channel_capacity.max(1),
            max_delivery_failures: config.max_delivery_failures.max(1),
        }
    }

    /// Register a new subscriber.
    ///
    /// Returns the receiver half of its outbound queue so the caller can
    /// forward frames to the WebSocket sink. Registering an id that is
    /// already present replaces the previous subscriber.
    pub async fn register(&self, conn_id: String) -> OutboundReceiver {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let subscriber = Subscriber {
            sender: tx,
            connected_at: chrono::Utc::now(),
            consecutive_failures: AtomicU32::new(0),
        };
        self.subscribers.write().await.insert(conn_id, subscriber);
        rx
    }

    /// Remove a subscriber. Unknown ids are ignored.
    ///
    /// Returns `true` if a subscriber was removed.
    pub async fn unregister(&self, conn_id: &str) -> bool {
        match self.subscribers.write().await.remove(conn_id) {
            Some(subscriber) => {
                let connected_for = chrono::Utc::now() - subscriber.connected_at;
                tracing::debug!(
                    conn_id = %conn_id,
                    connected_secs = connected_for.num_seconds(),
                    "Alert subscriber unregistered",
                );
                true
            }
            None => false,
        }
    }

    /// Return the current number of subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Offer a frame to every subscriber.
    ///
    /// Never blocks on a subscriber. Failures are isolated per subscriber and
    /// reported in the returned [`BroadcastReport`].
    pub async fn broadcast(&self, message: Message) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut doomed = Vec::new();

        {
            let subscribers = self.subscribers.read().await;
            for (conn_id, subscriber) in subscribers.iter() {
                match subscriber.offer(message.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(failure) => {
                        report.failed += 1;
                        tracing::debug!(conn_id = %conn_id, ?failure, "Alert delivery failed");
                        if self.should_prune(failure) {
                            doomed.push(conn_id.clone());
                        }
                    }
                }
            }
        }

        if !doomed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for conn_id in &doomed {
                if subscribers.remove(conn_id).is_some() {
                    tracing::info!(conn_id = %conn_id, "Pruned unresponsive alert subscriber");
                }
            }
        }

        report.pruned = doomed;
        report
    }

    /// Serialize an alert event and broadcast it as a text frame.
    pub async fn broadcast_event(
        &self,
        event: &AlertEvent,
    ) -> Result<BroadcastReport, serde_json::Error> {
        let json = event.to_json()?;
        Ok(self.broadcast(Message::Text(json.into())).await)
    }

    /// Send a Ping frame to every subscriber.
    ///
    /// Goes through the same hand-off as alerts, so subscribers whose socket
    /// task has exited are pruned here even when no alerts are flowing.
    pub async fn ping_all(&self) -> BroadcastReport {
        self.broadcast(Message::Ping(Bytes::new())).await
    }

    /// Offer a Close frame to every subscriber, then clear the registry.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        for subscriber in subscribers.values() {
            let _ = subscriber.sender.try_send(Message::Close(None));
        }
        subscribers.clear();
        tracing::info!(count, "Closed all alert subscribers");
    }

    fn should_prune(&self, failure: DeliveryFailure) -> bool {
        match failure {
            DeliveryFailure::Closed => true,
            DeliveryFailure::QueueFull { consecutive } => {
                consecutive >= self.max_delivery_failures
            }
        }
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(&BroadcastConfig::default())
    }
}
