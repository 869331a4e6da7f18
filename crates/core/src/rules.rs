//! Threshold rule matching.
//!
//! Pure logic, no database access. The caller loads the owner's rules and the
//! heartbeat, runs [`check_rule`] (or [`match_rules`]) and persists whatever
//! triggered.

use crate::heartbeat::MetricReadings;
use crate::metric::{Comparator, Metric};
use crate::types::DbId;

/// The parts of a stored rule that matching looks at.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdRule<'a> {
    pub id: DbId,
    pub metric: &'a str,
    pub condition: &'a str,
    pub threshold: f64,
    /// Devices the rule is limited to. Empty means every device of the owner.
    pub device_ids: &'a [DbId],
    pub is_active: bool,
}

impl ThresholdRule<'_> {
    pub fn applies_to(&self, device_id: DbId) -> bool {
        self.device_ids.is_empty() || self.device_ids.contains(&device_id)
    }
}

/// Why a rule was not considered for a heartbeat.
///
/// Skips are soft: they are logged by the caller and never abort evaluation
/// of the remaining rules.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Inactive,
    /// The rule is scoped to other devices.
    OutOfScope,
    UnknownMetric(String),
    UnknownComparator(String),
}

/// A rule whose condition held for a heartbeat.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub rule_id: DbId,
    pub metric: Metric,
    pub comparator: Comparator,
    /// Observed metric value.
    pub value: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Triggered(Trigger),
    NotTriggered,
    Skipped(SkipReason),
}

/// Evaluate one rule against the readings of one device's heartbeat.
pub fn check_rule(rule: &ThresholdRule<'_>, device_id: DbId, readings: &MetricReadings) -> RuleOutcome {
    if !rule.is_active {
        return RuleOutcome::Skipped(SkipReason::Inactive);
    }
    if !rule.applies_to(device_id) {
        return RuleOutcome::Skipped(SkipReason::OutOfScope);
    }
    let Some(metric) = Metric::parse(rule.metric) else {
        return RuleOutcome::Skipped(SkipReason::UnknownMetric(rule.metric.to_string()));
    };
    let Some(comparator) = Comparator::parse(rule.condition) else {
        return RuleOutcome::Skipped(SkipReason::UnknownComparator(rule.condition.to_string()));
    };

    let value = readings.value(metric);
    if comparator.holds(value, rule.threshold) {
        RuleOutcome::Triggered(Trigger {
            rule_id: rule.id,
            metric,
            comparator,
            value,
            threshold: rule.threshold,
        })
    } else {
        RuleOutcome::NotTriggered
    }
}

/// Evaluate a rule set and return the triggers in input order.
pub fn match_rules<'a, I>(rules: I, device_id: DbId, readings: &MetricReadings) -> Vec<Trigger>
where
    I: IntoIterator<Item = ThresholdRule<'a>>,
{
    rules
        .into_iter()
        .filter_map(|rule| match check_rule(&rule, device_id, readings) {
            RuleOutcome::Triggered(trigger) => Some(trigger),
            RuleOutcome::NotTriggered | RuleOutcome::Skipped(_) => None,
        })
        .collect()
}

/// Human-readable alert text, e.g.
/// `Device Server Room Sensor - cpu_usage is 95 (threshold: 90)`.
pub fn render_alert_message(device_name: &str, metric: Metric, value: f64, threshold: f64) -> String {
    format!("Device {device_name} - {metric} is {value} (threshold: {threshold})")
}
