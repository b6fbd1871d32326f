//! Configuration management for the dispatch server.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Seeded customer and driver directory
    pub roster: RosterConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter in `EnvFilter` syntax
    pub log_level: String,
    /// Allowed CORS origin (`*` for any)
    pub cors_allowed_origin: String,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

/// Roster seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Number of customers (`Customer #1..=n`)
    pub customers: u64,
    /// Number of drivers (`Driver #1..=n`)
    pub drivers: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
                log_level: lookup("RUST_LOG")
                    .unwrap_or_else(|| "easytaxi=info,tower_http=info".to_string()),
                cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                    .unwrap_or_else(|| "*".to_string()),
                metrics_enabled: lookup("METRICS_ENABLED")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
            },
            roster: RosterConfig {
                customers: lookup("ROSTER_CUSTOMERS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                drivers: lookup("ROSTER_DRIVERS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_public_service() {
        let config = Config::default();

        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.server.cors_allowed_origin, "*");
        assert!(config.server.metrics_enabled);
        assert_eq!(config.roster.customers, 10);
        assert_eq!(config.roster.drivers, 10);
    }

    #[test]
    fn overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("METRICS_ENABLED", "false"),
            ("ROSTER_DRIVERS", "many"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.server.port, 8080);
        assert!(!config.server.metrics_enabled);
        assert_eq!(config.roster.drivers, 10);
    }
}
