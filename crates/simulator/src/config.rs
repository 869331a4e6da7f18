//! Environment-driven configuration for the simulator and the watcher.

use std::time::Duration;

/// Default API base URL.
const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default alert stream URL.
const DEFAULT_ALERTS_WS_URL: &str = "ws://localhost:3000/api/v1/notifications/ws";

/// Default seconds between two heartbeats of one device.
const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Baseline behaviour of one simulated device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    pub sn: String,
    pub name: String,
    pub base_cpu: f64,
    pub base_ram: f64,
    pub base_temp: f64,
    pub base_disk_free: f64,
}

impl DeviceProfile {
    /// Three devices with distinct load profiles, used when `MULTI_DEVICE`
    /// is set.
    pub fn presets() -> Vec<DeviceProfile> {
        vec![
            DeviceProfile {
                sn: "SRV001234567".to_string(),
                name: "Server Room Sensor".to_string(),
                base_cpu: 25.0,
                base_ram: 45.0,
                base_temp: 42.0,
                base_disk_free: 75.0,
            },
            DeviceProfile {
                sn: "OFF987654321".to_string(),
                name: "Office Environment Monitor".to_string(),
                base_cpu: 15.0,
                base_ram: 30.0,
                base_temp: 38.0,
                base_disk_free: 75.0,
            },
            DeviceProfile {
                sn: "IOT555666777".to_string(),
                name: "IoT Gateway Device".to_string(),
                base_cpu: 40.0,
                base_ram: 60.0,
                base_temp: 55.0,
                base_disk_free: 75.0,
            },
        ]
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            sn: "TEST12345678".to_string(),
            name: "Test Device".to_string(),
            base_cpu: 30.0,
            base_ram: 40.0,
            base_temp: 45.0,
            base_disk_free: 75.0,
        }
    }
}

/// Simulator settings.
///
/// | Env var              | Default                 |
/// |----------------------|-------------------------|
/// | `API_URL`            | `http://localhost:3000` |
/// | `HEARTBEAT_INTERVAL` | `60` (seconds)          |
/// | `MULTI_DEVICE`       | `false`                 |
/// | `DEVICE_SN`          | `TEST12345678`          |
/// | `DEVICE_NAME`        | `Test Device`           |
/// | `BASE_CPU`           | `30`                    |
/// | `BASE_RAM`           | `40`                    |
/// | `BASE_TEMP`          | `45`                    |
/// | `BASE_DISK_FREE`     | `75`                    |
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub api_url: String,
    pub interval: Duration,
    /// One entry per simulated device.
    pub devices: Vec<DeviceProfile>,
}

impl SimulatorConfig {
    /// Load from environment variables. Unparseable values fall back to
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = get("API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let interval_secs = get("HEARTBEAT_INTERVAL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        let multi = get("MULTI_DEVICE").is_some_and(|v| v.eq_ignore_ascii_case("true"));

        let devices = if multi {
            DeviceProfile::presets()
        } else {
            let defaults = DeviceProfile::default();
            let number = |key: &str, default: f64| {
                get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
            };
            vec![DeviceProfile {
                sn: get("DEVICE_SN").unwrap_or(defaults.sn),
                name: get("DEVICE_NAME").unwrap_or(defaults.name),
                base_cpu: number("BASE_CPU", defaults.base_cpu),
                base_ram: number("BASE_RAM", defaults.base_ram),
                base_temp: number("BASE_TEMP", defaults.base_temp),
                base_disk_free: number("BASE_DISK_FREE", defaults.base_disk_free),
            }]
        };

        Self {
            api_url,
            interval: Duration::from_secs(interval_secs),
            devices,
        }
    }

    /// Full URL of the heartbeat intake endpoint.
    pub fn heartbeat_url(&self) -> String {
        format!("{}/api/v1/heartbeat", self.api_url)
    }
}

/// Alert stream URL for the watcher, from `ALERTS_WS_URL`.
pub fn alerts_ws_url() -> String {
    std::env::var("ALERTS_WS_URL").unwrap_or_else(|_| DEFAULT_ALERTS_WS_URL.to_string())
}
