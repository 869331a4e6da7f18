//! Shared input validation helpers.
//!
//! Request payloads either derive [`validator::Validate`] and go through
//! [`validate_input`], or are checked field by field with the small helpers
//! below. Both report failures as [`CoreError::Validation`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::metric::{Comparator, Metric};

/// Length of a device serial number.
pub const SERIAL_NUMBER_LEN: usize = 12;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Run derived validation and flatten any failures into one message.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Render validation errors as `field: message` pairs sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Require a non-blank string.
pub fn validate_required(value: &str, name: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{name} is required")));
    }
    Ok(())
}

/// Device serial numbers are exactly [`SERIAL_NUMBER_LEN`] characters.
pub fn validate_serial_number(sn: &str) -> Result<(), CoreError> {
    let len = sn.chars().count();
    if len != SERIAL_NUMBER_LEN {
        return Err(CoreError::Validation(format!(
            "sn must be exactly {SERIAL_NUMBER_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

/// A rule must watch a known heartbeat metric.
pub fn validate_metric_name(name: &str) -> Result<Metric, CoreError> {
    Metric::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Metric::ALL.iter().map(|m| m.as_str()).collect();
        CoreError::Validation(format!(
            "unknown metric '{name}', expected one of: {}",
            known.join(", ")
        ))
    })
}

/// A rule condition must be one of `>`, `<`, `>=`, `<=`, `==`.
pub fn validate_comparator(symbol: &str) -> Result<Comparator, CoreError> {
    Comparator::parse(symbol).ok_or_else(|| {
        CoreError::Validation(format!(
            "unknown condition '{symbol}', expected one of: >, <, >=, <=, =="
        ))
    })
}

/// Thresholds must be finite numbers.
pub fn validate_threshold(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "threshold must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Minimal shape check for an email address (`local@domain`).
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn serial_number_must_be_twelve_chars() {
        assert!(validate_serial_number("TEST12345678").is_ok());
        assert_matches!(
            validate_serial_number("SHORT"),
            Err(CoreError::Validation(msg)) if msg.contains("got 5")
        );
        assert!(validate_serial_number("TEST123456789").is_err());
    }

    #[test]
    fn metric_names_resolve_or_fail() {
        assert_eq!(validate_metric_name("temperature").unwrap(), Metric::Temperature);
        assert_matches!(
            validate_metric_name("humidity"),
            Err(CoreError::Validation(msg)) if msg.contains("cpu_usage")
        );
    }

    #[test]
    fn comparators_resolve_or_fail() {
        assert_eq!(validate_comparator(">=").unwrap(), Comparator::GreaterOrEqual);
        assert!(validate_comparator("=>").is_err());
    }

    #[test]
    fn thresholds_must_be_finite() {
        assert!(validate_threshold(-12.5).is_ok());
        assert!(validate_threshold(f64::INFINITY).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("ops@example.com").is_ok());
        assert!(validate_email("ops.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ops@localhost").is_err());
    }

    #[test]
    fn required_rejects_blank() {
        assert!(validate_required("Rack A1", "location").is_ok());
        assert_matches!(
            validate_required("   ", "location"),
            Err(CoreError::Validation(msg)) if msg == "location is required"
        );
    }

    #[test]
    fn password_length() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }
}
