//! Heartbeat payload shape, field validation and metric readings.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::metric::Metric;
use crate::types::Timestamp;
use crate::validation::validate_input;

/// One telemetry sample as pushed by a device.
///
/// The device is identified by its external serial number, never by the
/// internal row id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HeartbeatPayload {
    #[validate(length(min = 1, message = "is required"))]
    pub device_sn: String,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub cpu_usage: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub ram_usage: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub disk_free: f64,
    pub temperature: f64,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub dns_latency: f64,
    #[validate(range(min = 0, max = 1, message = "must be 0 or 1"))]
    pub connectivity: i32,
    pub boot_time: Timestamp,
}

impl HeartbeatPayload {
    /// Check every bounded field. Runs before anything is persisted.
    pub fn check(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        if !self.temperature.is_finite() {
            return Err(CoreError::Validation(
                "temperature: must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn readings(&self) -> MetricReadings {
        MetricReadings {
            cpu_usage: self.cpu_usage,
            ram_usage: self.ram_usage,
            disk_free: self.disk_free,
            temperature: self.temperature,
            dns_latency: self.dns_latency,
            connectivity: self.connectivity,
        }
    }
}

/// The numeric fields of a heartbeat, addressable by [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricReadings {
    pub cpu_usage: f64,
    pub ram_usage: f64,
    pub disk_free: f64,
    pub temperature: f64,
    pub dns_latency: f64,
    pub connectivity: i32,
}

impl MetricReadings {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::CpuUsage => self.cpu_usage,
            Metric::RamUsage => self.ram_usage,
            Metric::DiskFree => self.disk_free,
            Metric::Temperature => self.temperature,
            Metric::DnsLatency => self.dns_latency,
            Metric::Connectivity => f64::from(self.connectivity),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn payload() -> HeartbeatPayload {
        HeartbeatPayload {
            device_sn: "SRV001234567".to_string(),
            cpu_usage: 35.5,
            ram_usage: 48.0,
            disk_free: 72.25,
            temperature: -4.0,
            dns_latency: 9.1,
            connectivity: 1,
            boot_time: Utc::now(),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().check().is_ok());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let mut hb = payload();
        hb.cpu_usage = 100.0;
        hb.ram_usage = 0.0;
        hb.disk_free = 100.0;
        hb.dns_latency = 0.0;
        hb.connectivity = 0;
        assert!(hb.check().is_ok());
    }

    #[test]
    fn percentage_out_of_range_is_rejected() {
        let mut hb = payload();
        hb.cpu_usage = 100.5;
        assert_matches!(
            hb.check(),
            Err(CoreError::Validation(msg)) if msg.contains("cpu_usage")
        );

        let mut hb = payload();
        hb.disk_free = -0.1;
        assert!(hb.check().is_err());
    }

    #[test]
    fn negative_latency_is_rejected() {
        let mut hb = payload();
        hb.dns_latency = -1.0;
        assert_matches!(
            hb.check(),
            Err(CoreError::Validation(msg)) if msg.contains("dns_latency")
        );
    }

    #[test]
    fn connectivity_must_be_binary() {
        let mut hb = payload();
        hb.connectivity = 2;
        assert_matches!(
            hb.check(),
            Err(CoreError::Validation(msg)) if msg.contains("connectivity: must be 0 or 1")
        );
    }

    #[test]
    fn temperature_is_unbounded_but_finite() {
        let mut hb = payload();
        hb.temperature = 1500.0;
        assert!(hb.check().is_ok());
        hb.temperature = f64::INFINITY;
        assert!(hb.check().is_err());
    }

    #[test]
    fn empty_serial_is_rejected() {
        let mut hb = payload();
        hb.device_sn.clear();
        assert!(hb.check().is_err());
    }

    #[test]
    fn readings_expose_every_metric() {
        let readings = payload().readings();
        assert_eq!(readings.value(Metric::CpuUsage), 35.5);
        assert_eq!(readings.value(Metric::RamUsage), 48.0);
        assert_eq!(readings.value(Metric::DiskFree), 72.25);
        assert_eq!(readings.value(Metric::Temperature), -4.0);
        assert_eq!(readings.value(Metric::DnsLatency), 9.1);
        assert_eq!(readings.value(Metric::Connectivity), 1.0);
    }
}
