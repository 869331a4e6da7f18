//! Synthetic telemetry with slow trends and occasional incidents.
//!
//! [`TelemetryGenerator`] keeps a little state between samples (CPU and
//! temperature trends, the shrinking disk) so consecutive heartbeats of one
//! device look related rather than independently random. Every sample it
//! produces passes [`HeartbeatPayload::check`].

use chrono::Utc;
use devpulse_core::heartbeat::HeartbeatPayload;
use devpulse_core::types::Timestamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DeviceProfile;

/// CPU trend random walk stays within this distance of the baseline.
pub const CPU_TREND_LIMIT: f64 = 20.0;

/// Temperature trend random walk stays within this distance of the baseline.
pub const TEMP_TREND_LIMIT: f64 = 10.0;

/// Temperatures are clamped to this range in degrees Celsius.
pub const TEMP_RANGE: (f64, f64) = (20.0, 90.0);

/// Free disk never drifts below this percentage.
pub const DISK_FREE_FLOOR: f64 = 10.0;

/// Baseline DNS latency in milliseconds.
pub const BASE_DNS_LATENCY: f64 = 8.8;

const CPU_SPIKE_CHANCE: f64 = 0.05;
const NETWORK_ISSUE_CHANCE: f64 = 0.10;
const RANDOM_DISCONNECT_CHANCE: f64 = 0.02;

/// Produces heartbeats for one simulated device.
pub struct TelemetryGenerator {
    profile: DeviceProfile,
    boot_time: Timestamp,
    cpu_trend: f64,
    temp_trend: f64,
    disk_free: f64,
    rng: StdRng,
}

impl TelemetryGenerator {
    pub fn new(profile: DeviceProfile) -> Self {
        Self::with_rng(profile, StdRng::from_os_rng())
    }

    /// Deterministic generator for tests.
    pub fn seeded(profile: DeviceProfile, seed: u64) -> Self {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }

    fn with_rng(profile: DeviceProfile, rng: StdRng) -> Self {
        let disk_free = profile.base_disk_free;
        Self {
            profile,
            boot_time: Utc::now(),
            cpu_trend: 0.0,
            temp_trend: 0.0,
            disk_free,
            rng,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn cpu_trend(&self) -> f64 {
        self.cpu_trend
    }

    pub fn temp_trend(&self) -> f64 {
        self.temp_trend
    }

    /// Generate the next heartbeat and advance the trends.
    pub fn next_heartbeat(&mut self) -> HeartbeatPayload {
        let rng = &mut self.rng;

        self.cpu_trend =
            (self.cpu_trend + rng.random_range(-2.0..=2.0)).clamp(-CPU_TREND_LIMIT, CPU_TREND_LIMIT);
        let mut cpu_usage =
            (self.profile.base_cpu + self.cpu_trend + rng.random_range(-10.0..=15.0)).clamp(0.0, 100.0);
        if rng.random_bool(CPU_SPIKE_CHANCE) {
            cpu_usage = (cpu_usage + rng.random_range(20.0..=40.0)).min(100.0);
        }

        let ram_usage = (self.profile.base_ram + rng.random_range(-5.0..=10.0)).clamp(0.0, 100.0);

        self.temp_trend =
            (self.temp_trend + rng.random_range(-1.0..=1.0)).clamp(-TEMP_TREND_LIMIT, TEMP_TREND_LIMIT);
        let temperature = (self.profile.base_temp + self.temp_trend + rng.random_range(-3.0..=3.0))
            .clamp(TEMP_RANGE.0, TEMP_RANGE.1);

        let disk_sample = self.disk_free - rng.random_range(0.0..=0.1);
        self.disk_free = disk_sample.max(DISK_FREE_FLOOR);
        let disk_free = disk_sample.clamp(0.0, 100.0);

        let network_issue = rng.random_bool(NETWORK_ISSUE_CHANCE);
        let dns_latency = if network_issue {
            BASE_DNS_LATENCY + rng.random_range(50.0..=200.0)
        } else {
            BASE_DNS_LATENCY + rng.random_range(-2.0..=10.0)
        }
        .max(1.0);

        let connectivity = if network_issue || rng.random_bool(RANDOM_DISCONNECT_CHANCE) {
            0
        } else {
            1
        };

        HeartbeatPayload {
            device_sn: self.profile.sn.clone(),
            cpu_usage: round2(cpu_usage),
            ram_usage: round2(ram_usage),
            disk_free: round2(disk_free),
            temperature: round2(temperature),
            dns_latency: round2(dns_latency),
            connectivity,
            boot_time: self.boot_time,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(35.456), 35.46);
        assert_eq!(round2(8.8), 8.8);
        assert_eq!(round2(0.004), 0.0);
    }
}
