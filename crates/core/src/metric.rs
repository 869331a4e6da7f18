//! Heartbeat metric names and threshold comparators.
//!
//! Rules store both as free text. These closed enums are the only way the
//! evaluator reads them: a name that fails to parse marks the rule as
//! misconfigured and it is skipped.

use std::fmt;

/// CPU utilisation percentage (0-100).
pub const METRIC_CPU_USAGE: &str = "cpu_usage";

/// RAM utilisation percentage (0-100).
pub const METRIC_RAM_USAGE: &str = "ram_usage";

/// Free disk space percentage (0-100).
pub const METRIC_DISK_FREE: &str = "disk_free";

/// Device temperature in degrees Celsius (unbounded).
pub const METRIC_TEMPERATURE: &str = "temperature";

/// DNS resolution latency in milliseconds (>= 0).
pub const METRIC_DNS_LATENCY: &str = "dns_latency";

/// Network connectivity flag (0 or 1).
pub const METRIC_CONNECTIVITY: &str = "connectivity";

/// A numeric field of a heartbeat that a rule can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    CpuUsage,
    RamUsage,
    DiskFree,
    Temperature,
    DnsLatency,
    Connectivity,
}

impl Metric {
    /// Every metric, in heartbeat field order.
    pub const ALL: [Metric; 6] = [
        Metric::CpuUsage,
        Metric::RamUsage,
        Metric::DiskFree,
        Metric::Temperature,
        Metric::DnsLatency,
        Metric::Connectivity,
    ];

    /// Canonical field name as stored on rules and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::CpuUsage => METRIC_CPU_USAGE,
            Metric::RamUsage => METRIC_RAM_USAGE,
            Metric::DiskFree => METRIC_DISK_FREE,
            Metric::Temperature => METRIC_TEMPERATURE,
            Metric::DnsLatency => METRIC_DNS_LATENCY,
            Metric::Connectivity => METRIC_CONNECTIVITY,
        }
    }

    /// Resolve a stored metric name. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            METRIC_CPU_USAGE => Some(Metric::CpuUsage),
            METRIC_RAM_USAGE => Some(Metric::RamUsage),
            METRIC_DISK_FREE => Some(Metric::DiskFree),
            METRIC_TEMPERATURE => Some(Metric::Temperature),
            METRIC_DNS_LATENCY => Some(Metric::DnsLatency),
            METRIC_CONNECTIVITY => Some(Metric::Connectivity),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied between an observed value and a rule threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
            Comparator::GreaterOrEqual => ">=",
            Comparator::LessOrEqual => "<=",
            Comparator::Equal => "==",
        }
    }

    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparator::GreaterThan),
            "<" => Some(Comparator::LessThan),
            ">=" => Some(Comparator::GreaterOrEqual),
            "<=" => Some(Comparator::LessOrEqual),
            "==" => Some(Comparator::Equal),
            _ => None,
        }
    }

    /// Whether `value <op> threshold` holds.
    ///
    /// Plain IEEE-754 comparison. `Equal` is exact: there is no epsilon, so a
    /// value that differs from the threshold in the last bit does not match.
    /// Any comparison involving NaN is false.
    #[allow(clippy::float_cmp)]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::GreaterThan => value > threshold,
            Comparator::LessThan => value < threshold,
            Comparator::GreaterOrEqual => value >= threshold,
            Comparator::LessOrEqual => value <= threshold,
            Comparator::Equal => value == threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
