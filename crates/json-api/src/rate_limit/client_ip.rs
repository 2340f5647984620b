//! Client identifier resolution.

use std::net::IpAddr;

use salvo::http::HeaderMap;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolve the address a request is rate limited under.
///
/// With `trust_proxy_headers` the first `X-Forwarded-For` hop wins, then
/// `X-Real-IP`. A proxy header that is present but unparseable yields `None`
/// rather than falling back to the peer address.
pub(super) fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trust_proxy_headers: bool,
) -> Option<IpAddr> {
    if !trust_proxy_headers {
        return peer;
    }

    if let Some(forwarded) = headers.get(X_FORWARDED_FOR) {
        return forwarded
            .to_str()
            .ok()?
            .split(',')
            .next()?
            .trim()
            .parse()
            .ok();
    }

    if let Some(real_ip) = headers.get(X_REAL_IP) {
        return real_ip.to_str().ok()?.trim().parse().ok();
    }

    peer
}
