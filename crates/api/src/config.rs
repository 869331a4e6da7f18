use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Alert stream delivery tuning.
    pub broadcast: BroadcastConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values or a missing `JWT_SECRET`. Misconfiguration
    /// should stop the process at start-up.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", 3000);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            broadcast: BroadcastConfig::from_env(),
        }
    }
}

/// Tuning for the per-subscriber alert queues.
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Capacity of each subscriber's outbound queue.
    pub channel_capacity: usize,
    /// Maximum time a single frame may take to reach the socket.
    pub send_timeout: Duration,
    /// Consecutive full-queue hand-offs after which a subscriber is dropped.
    pub max_delivery_failures: u32,
    /// Interval between keep-alive pings.
    pub ping_interval: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            send_timeout: Duration::from_secs(5),
            max_delivery_failures: 3,
            ping_interval: Duration::from_secs(30),
        }
    }
}

impl BroadcastConfig {
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `WS_CHANNEL_CAPACITY`      | `64`    |
    /// | `WS_SEND_TIMEOUT_SECS`     | `5`     |
    /// | `WS_MAX_DELIVERY_FAILURES` | `3`     |
    /// | `WS_PING_INTERVAL_SECS`    | `30`    |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let channel_capacity: usize = env_or("WS_CHANNEL_CAPACITY", defaults.channel_capacity);
        assert!(channel_capacity > 0, "WS_CHANNEL_CAPACITY must be positive");

        let max_delivery_failures: u32 =
            env_or("WS_MAX_DELIVERY_FAILURES", defaults.max_delivery_failures);
        assert!(
            max_delivery_failures > 0,
            "WS_MAX_DELIVERY_FAILURES must be positive"
        );

        Self {
            channel_capacity,
            send_timeout: Duration::from_secs(env_or(
                "WS_SEND_TIMEOUT_SECS",
                defaults.send_timeout.as_secs(),
            )),
            max_delivery_failures,
            ping_interval: Duration::from_secs(env_or(
                "WS_PING_INTERVAL_SECS",
                defaults.ping_interval.as_secs(),
            )),
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid value: {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn broadcast_defaults() {
        let config = BroadcastConfig::default();
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.send_timeout, Duration::from_secs(5));
        assert_eq!(config.max_delivery_failures, 3);
        assert_eq!(config.ping_interval, Duration::from_secs(30));
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        let value: u64 = env_or("DEVPULSE_TEST_SURELY_UNSET_VARIABLE", 17);
        assert_eq!(value, 17);
    }
}
