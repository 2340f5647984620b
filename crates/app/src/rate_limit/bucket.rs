//! Token bucket.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

/// Refill rate and capacity of a bucket.
///
/// The bucket holds up to `burst` tokens and refills continuously at `rps`
/// tokens per second. Each admitted request consumes one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    rps: f64,
    burst: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateLimitConfigError {
    #[error("limiter rps must be a positive, finite number")]
    InvalidRate,

    #[error("limiter burst must be at least 1")]
    InvalidBurst,
}

impl RateLimitConfig {
    /// # Errors
    ///
    /// Returns an error when `rps` is not a positive finite number or `burst`
    /// is zero.
    pub fn new(rps: f64, burst: u32) -> Result<Self, RateLimitConfigError> {
        if !rps.is_finite() || rps <= 0.0 {
            return Err(RateLimitConfigError::InvalidRate);
        }

        if burst == 0 {
            return Err(RateLimitConfigError::InvalidBurst);
        }

        Ok(Self { rps, burst })
    }

    #[must_use]
    pub const fn rps(&self) -> f64 {
        self.rps
    }

    #[must_use]
    pub const fn burst(&self) -> u32 {
        self.burst
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// A bucket filled to capacity.
    pub(crate) fn full(config: RateLimitConfig, now: Instant) -> Self {
        Self {
            tokens: f64::from(config.burst),
            last_refill: now,
        }
    }

    /// Refill for the time elapsed since the last call, then take one token.
    ///
    /// Returns how long until a token becomes available when the bucket is
    /// empty.
    pub(crate) fn try_acquire(
        &mut self,
        config: RateLimitConfig,
        now: Instant,
    ) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let refill = elapsed.as_secs_f64() * config.rps;

        self.tokens = (self.tokens + refill).min(f64::from(config.burst));
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            return Ok(());
        }

        let deficit = 1.0 - self.tokens;

        Err(Duration::try_from_secs_f64(deficit / config.rps).unwrap_or(Duration::MAX))
    }
}
