//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    limiter::LimiterConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    tokens::TokensConfig,
};

pub(crate) mod db;
pub(crate) mod limiter;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod tokens;

/// Dialed-In JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "dialed-in-json", about = "Dialed-In JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Per-client rate limiter settings.
    #[command(flatten)]
    pub limiter: LimiterConfig,

    /// Token lifetimes.
    #[command(flatten)]
    pub tokens: TokensConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_documented_values() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "dialed-in-json",
            "--database-url",
            "postgres://localhost/dialed_in",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:4000");
        assert_eq!(config.database.pool_settings().max_connections, 25);
        assert_eq!(
            config.database.pool_settings().query_timeout,
            Duration::from_secs(3)
        );

        let limiter = config.limiter.settings();

        assert!(limiter.enabled, "limiter should be enabled by default");
        assert!((limiter.rps - 2.0).abs() < f64::EPSILON, "default rps is 2");
        assert_eq!(limiter.burst, 4);
        assert_eq!(limiter.expiration, Duration::from_secs(180));

        let lifetimes = config.tokens.lifetimes();

        assert_eq!(lifetimes.authentication, SignedDuration::from_hours(350));
        assert_eq!(lifetimes.activation, SignedDuration::from_hours(72));
        assert_eq!(lifetimes.password_reset, SignedDuration::from_mins(45));

        Ok(())
    }

    #[test]
    fn limiter_flags_override_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "dialed-in-json",
            "--database-url",
            "postgres://localhost/dialed_in",
            "--limiter-enabled",
            "false",
            "--limiter-rps",
            "0.5",
            "--limiter-burst",
            "1",
            "--limiter-trust-proxy-headers",
            "true",
        ])?;

        let limiter = config.limiter.settings();

        assert!(!limiter.enabled, "limiter should be disabled");
        assert!((limiter.rps - 0.5).abs() < f64::EPSILON, "rps should be 0.5");
        assert_eq!(limiter.burst, 1);
        assert!(
            config.limiter.trust_proxy_headers,
            "proxy headers should be trusted"
        );

        Ok(())
    }
}
