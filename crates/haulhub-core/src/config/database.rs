//! Database configuration.

use serde::{Deserialize, Serialize};

/// PostgreSQL pool settings.
///
/// Booking admission leans on the database as the final arbiter, so the
/// pool is sized for short bursts of small writes rather than
/// long-running queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept warm while idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// How long to wait for a free connection, in seconds.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Idle connection reap threshold, in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Hard cap on any connection's lifetime, in seconds.
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_seconds: u64,
}

fn default_max_connections() -> u32 {
    16
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_lifetime() -> u64 {
    1800
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_defaults_apply_when_omitted() {
        let config: DatabaseConfig =
            serde_json::from_value(serde_json::json!({ "url": "postgres://localhost/haulhub" }))
                .expect("minimal config");
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_seconds, 5);
        assert_eq!(config.max_lifetime_seconds, 1800);
    }
}
