//! Rate Limiter Config

use std::time::Duration;

use clap::Args;

use dialed_in_app::rate_limit::{
    DEFAULT_BURST, DEFAULT_EXPIRATION, DEFAULT_RPS, DEFAULT_SWEEP_INTERVAL, LimiterSettings,
};

/// Per-client token bucket settings.
#[derive(Debug, Args)]
pub struct LimiterConfig {
    /// Enable the rate limiter
    #[arg(
        long,
        env = "LIMITER_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub limiter_enabled: bool,

    /// Steady refill rate in requests per second
    #[arg(long, env = "LIMITER_RPS", default_value_t = DEFAULT_RPS)]
    pub limiter_rps: f64,

    /// Bucket capacity
    #[arg(long, env = "LIMITER_BURST", default_value_t = DEFAULT_BURST)]
    pub limiter_burst: u32,

    /// Idle time after which a client's bucket is forgotten, in seconds
    #[arg(
        long,
        env = "LIMITER_EXPIRATION_SECONDS",
        default_value_t = DEFAULT_EXPIRATION.as_secs()
    )]
    pub limiter_expiration_seconds: u64,

    /// Key clients by `X-Forwarded-For` / `X-Real-IP` instead of the peer address
    #[arg(
        long,
        env = "LIMITER_TRUST_PROXY_HEADERS",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    pub trust_proxy_headers: bool,
}

impl LimiterConfig {
    #[must_use]
    pub fn settings(&self) -> LimiterSettings {
        LimiterSettings {
            enabled: self.limiter_enabled,
            rps: self.limiter_rps,
            burst: self.limiter_burst,
            expiration: Duration::from_secs(self.limiter_expiration_seconds),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}
