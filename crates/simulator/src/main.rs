//! `devpulse-simulator` -- synthetic device heartbeat producer.
//!
//! Generates realistic telemetry for one device (or three preset devices
//! with `MULTI_DEVICE=true`) and POSTs it to the heartbeat intake.
//!
//! # Environment variables
//!
//! | Variable             | Default                 | Description                    |
//! |----------------------|-------------------------|--------------------------------|
//! | `API_URL`            | `http://localhost:3000` | Base URL of the API            |
//! | `HEARTBEAT_INTERVAL` | `60`                    | Seconds between heartbeats     |
//! | `MULTI_DEVICE`       | `false`                 | Run the three preset devices   |
//! | `DEVICE_SN`          | `TEST12345678`          | Serial of the single device    |
//! | `BASE_CPU` / `BASE_RAM` / `BASE_TEMP` / `BASE_DISK_FREE` | | Single-device baselines |

use std::time::Duration;

use devpulse_simulator::config::SimulatorConfig;
use devpulse_simulator::generator::TelemetryGenerator;
use devpulse_simulator::sender::{self, HeartbeatSender};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Delay between starting two simulated devices.
const STAGGER: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devpulse_simulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimulatorConfig::from_env();

    let sender = HeartbeatSender::new(config.heartbeat_url()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.api_url,
        devices = config.devices.len(),
        interval_secs = config.interval.as_secs(),
        "Starting devpulse-simulator",
    );

    let mut tasks = Vec::with_capacity(config.devices.len());
    for (i, profile) in config.devices.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(STAGGER).await;
        }
        let generator = TelemetryGenerator::new(profile);
        tasks.push(tokio::spawn(sender::run_device(
            sender.clone(),
            generator,
            config.interval,
        )));
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Simulator stopped");

    for task in tasks {
        task.abort();
    }
}
