//! Per-client rate limiting hoop.

mod client_ip;
pub(crate) mod middleware;
