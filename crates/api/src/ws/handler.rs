use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::{OutboundReceiver, SubscriberRegistry};

/// GET /api/v1/notifications/ws
///
/// Upgrades the connection to WebSocket and registers it as an alert
/// subscriber.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = Arc::clone(&state.subscribers);
    let send_timeout = state.config.broadcast.send_timeout;
    ws.on_upgrade(move |socket| handle_socket(socket, registry, send_timeout))
}

/// Manage a single subscriber connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), runs a
/// writer task draining the subscriber queue and a reader task that only
/// watches for close, and unregisters as soon as either side finishes.
async fn handle_socket(socket: WebSocket, registry: Arc<SubscriberRegistry>, send_timeout: Duration) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Alert subscriber connected");

    let rx = registry.register(conn_id.clone()).await;
    let (sink, stream) = socket.split();

    let mut send_task = tokio::spawn(write_loop(sink, rx, send_timeout, conn_id.clone()));
    let mut recv_task = tokio::spawn(read_loop(stream, conn_id.clone()));

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    registry.unregister(&conn_id).await;
    tracing::info!(conn_id = %conn_id, "Alert subscriber disconnected");
}

/// Forward queued frames to the socket, each bounded by `send_timeout`.
///
/// Ends when the queue is closed (the subscriber was pruned or the registry
/// shut down), after a Close frame, or on the first failed or stalled write.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: OutboundReceiver,
    send_timeout: Duration,
    conn_id: String,
) {
    while let Some(msg) = rx.recv().await {
        let is_close = matches!(msg, Message::Close(_));
        match tokio::time::timeout(send_timeout, sink.send(msg)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket sink closed");
                return;
            }
            Err(_) => {
                tracing::warn!(
                    conn_id = %conn_id,
                    timeout_ms = send_timeout.as_millis() as u64,
                    "WebSocket write timed out",
                );
                return;
            }
        }
        if is_close {
            return;
        }
    }

    // Queue closed without an explicit Close frame: we were pruned.
    let _ = tokio::time::timeout(send_timeout, sink.send(Message::Close(None))).await;
}

/// Drain inbound frames. Subscribers are not expected to send anything but
/// keep-alive traffic, so everything except Close is ignored.
async fn read_loop(mut stream: SplitStream<WebSocket>, conn_id: String) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {
                tracing::trace!(conn_id = %conn_id, "Ignoring inbound frame");
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }
}
