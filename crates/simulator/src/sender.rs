//! HTTP push loop for simulated heartbeats.
//!
//! Each simulated device runs [`run_device`] on its own task. Failures are
//! logged and the loop carries on with the next sample; a simulator never
//! exits because the API is down.

use std::time::Duration;

use devpulse_core::heartbeat::HeartbeatPayload;
use reqwest::StatusCode;

use crate::generator::TelemetryGenerator;

/// Per-request timeout for heartbeat POSTs.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("heartbeat rejected with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Posts heartbeats to the intake endpoint.
#[derive(Clone)]
pub struct HeartbeatSender {
    client: reqwest::Client,
    url: String,
}

impl HeartbeatSender {
    pub fn new(url: impl Into<String>) -> Result<Self, SendError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one heartbeat. Anything but a 2xx answer is an error.
    pub async fn send(&self, heartbeat: &HeartbeatPayload) -> Result<(), SendError> {
        let response = self.client.post(&self.url).json(heartbeat).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SendError::Rejected { status, body })
    }
}

/// Generate and push heartbeats for one device until the task is dropped.
pub async fn run_device(sender: HeartbeatSender, mut generator: TelemetryGenerator, interval: Duration) {
    let sn = generator.profile().sn.clone();
    tracing::info!(
        device_sn = %sn,
        device = %generator.profile().name,
        url = %sender.url(),
        interval_secs = interval.as_secs(),
        "Starting heartbeat simulator",
    );

    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;

        let heartbeat = generator.next_heartbeat();
        match sender.send(&heartbeat).await {
            Ok(()) => tracing::info!(
                device_sn = %sn,
                cpu = heartbeat.cpu_usage,
                ram = heartbeat.ram_usage,
                temperature = heartbeat.temperature,
                connectivity = heartbeat.connectivity,
                "Heartbeat sent",
            ),
            Err(SendError::Rejected { status, body }) => {
                tracing::warn!(device_sn = %sn, %status, body = %body, "Heartbeat rejected");
            }
            Err(e) => tracing::error!(device_sn = %sn, error = %e, "Failed to send heartbeat"),
        }
    }
}
