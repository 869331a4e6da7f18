//! `devpulse-watch` -- logs every alert pushed on the live alert stream.
//!
//! Reads the stream URL from `ALERTS_WS_URL`
//! (default `ws://localhost:3000/api/v1/notifications/ws`).

use devpulse_simulator::config::alerts_ws_url;
use devpulse_simulator::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devpulse_simulator=info,devpulse_watch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let url = alerts_ws_url();

    tokio::select! {
        _ = watch::run(&url) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("Watcher stopped"),
    }
}
