//! Alert stream tail client.
//!
//! Connects to the server's alert WebSocket, logs every notification event
//! and reconnects with a fixed delay whenever the connection drops.

use std::time::Duration;

use devpulse_core::alert::{AlertEvent, EVENT_TYPE_NOTIFICATION};
use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Reconnection delay after a WebSocket failure.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Parse a text frame from the alert stream.
///
/// Returns `None` for anything that is not a well-formed notification
/// event, so future event types are skipped rather than treated as errors.
pub fn parse_event(text: &str) -> Option<AlertEvent> {
    serde_json::from_str::<AlertEvent>(text)
        .ok()
        .filter(|event| event.event_type == EVENT_TYPE_NOTIFICATION)
}

/// Tail the alert stream indefinitely.
pub async fn run(ws_url: &str) {
    loop {
        tracing::info!(url = %ws_url, "Connecting to alert stream");

        match connect_async(ws_url).await {
            Ok((ws_stream, _response)) => {
                tracing::info!("Alert stream connected");
                let (_sink, mut stream) = ws_stream.split();
                while let Some(msg) = stream.next().await {
                    match msg {
                        Ok(Message::Text(text)) => log_frame(&text),
                        Ok(Message::Close(frame)) => {
                            tracing::info!(?frame, "Server closed alert stream");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Alert stream receive error");
                            break;
                        }
                    }
                }
                tracing::warn!("Alert stream ended, reconnecting");
            }
            Err(e) => {
                tracing::error!(error = %e, "Alert stream connection failed");
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

fn log_frame(text: &str) {
    match parse_event(text) {
        Some(event) => tracing::warn!(
            alert_id = event.alert.id,
            device = %event.alert.device_name,
            metric = %event.alert.metric,
            value = event.alert.value,
            threshold = event.alert.threshold,
            "{}",
            event.alert.message,
        ),
        None => tracing::debug!(raw = %text, "Ignoring unrecognised frame"),
    }
}
