//! Per-client request rate limiting.

mod bucket;
mod service;

pub use bucket::{RateLimitConfig, RateLimitConfigError};
pub use service::*;
