//! Integration tests for the telemetry generator.
//!
//! Runs long seeded sequences and checks that every sample is a valid
//! heartbeat and that the stateful trends stay in their bounds.

use devpulse_simulator::config::DeviceProfile;
use devpulse_simulator::generator::{
    TelemetryGenerator, BASE_DNS_LATENCY, CPU_TREND_LIMIT, DISK_FREE_FLOOR, TEMP_RANGE,
    TEMP_TREND_LIMIT,
};

const SAMPLES: usize = 2_000;

// ---------------------------------------------------------------------------
// Validity
// ---------------------------------------------------------------------------

#[test]
fn every_sample_passes_heartbeat_validation() {
    for profile in DeviceProfile::presets() {
        let mut generator = TelemetryGenerator::seeded(profile, 7);
        for i in 0..SAMPLES {
            let hb = generator.next_heartbeat();
            assert!(hb.check().is_ok(), "sample {i} invalid: {hb:?}");
        }
    }
}

#[test]
fn samples_carry_the_device_serial_and_a_fixed_boot_time() {
    let mut generator = TelemetryGenerator::seeded(DeviceProfile::default(), 1);
    let first = generator.next_heartbeat();
    let second = generator.next_heartbeat();
    assert_eq!(first.device_sn, "TEST12345678");
    assert_eq!(first.boot_time, second.boot_time);
}

// ---------------------------------------------------------------------------
// Trends and ranges
// ---------------------------------------------------------------------------

#[test]
fn trends_stay_bounded() {
    let mut generator = TelemetryGenerator::seeded(DeviceProfile::default(), 42);
    for _ in 0..SAMPLES {
        let hb = generator.next_heartbeat();
        assert!(generator.cpu_trend().abs() <= CPU_TREND_LIMIT);
        assert!(generator.temp_trend().abs() <= TEMP_TREND_LIMIT);
        assert!(hb.temperature >= TEMP_RANGE.0 && hb.temperature <= TEMP_RANGE.1);
    }
}

#[test]
fn disk_free_only_shrinks_down_to_the_floor() {
    let profile = DeviceProfile {
        base_disk_free: 10.5,
        ..DeviceProfile::default()
    };
    let mut generator = TelemetryGenerator::seeded(profile, 3);
    let mut previous = f64::MAX;
    for _ in 0..SAMPLES {
        let hb = generator.next_heartbeat();
        assert!(hb.disk_free <= previous + 0.1);
        assert!(hb.disk_free >= DISK_FREE_FLOOR - 0.1);
        previous = hb.disk_free;
    }
}

#[test]
fn network_issues_show_up_as_slow_dns_and_lost_connectivity() {
    let mut generator = TelemetryGenerator::seeded(DeviceProfile::default(), 99);
    let samples: Vec<_> = (0..SAMPLES).map(|_| generator.next_heartbeat()).collect();

    let slow: Vec<_> = samples
        .iter()
        .filter(|hb| hb.dns_latency > BASE_DNS_LATENCY + 10.0)
        .collect();
    assert!(!slow.is_empty());
    assert!(slow.iter().all(|hb| hb.connectivity == 0));

    let offline = samples.iter().filter(|hb| hb.connectivity == 0).count();
    let online = samples.len() - offline;
    assert!(online > offline);
}

#[test]
fn serializes_to_the_intake_shape() {
    let mut generator = TelemetryGenerator::seeded(DeviceProfile::default(), 5);
    let json = serde_json::to_value(generator.next_heartbeat()).unwrap();
    for field in [
        "device_sn",
        "cpu_usage",
        "ram_usage",
        "disk_free",
        "temperature",
        "dns_latency",
        "connectivity",
        "boot_time",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert!(json["boot_time"].is_string());
}
