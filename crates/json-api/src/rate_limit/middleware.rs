//! Rate limiter hoop.
//!
//! Runs ahead of the authenticator so anonymous traffic is limited too.

use std::{net::IpAddr, sync::Arc};

use salvo::{http::header::RETRY_AFTER, prelude::*};
use tracing::{error, warn};

use dialed_in_app::rate_limit::Admission;

use crate::{extensions::*, observability::observe_rate_limited, state::State};

use super::client_ip::resolve_client_ip;

pub(crate) const RATE_LIMIT_MESSAGE: &str = "rate limit exceeded";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    if !state.limiter.is_enabled() {
        ctrl.call_next(req, depot, res).await;

        return;
    }

    let Some(client) = resolve_client_ip(
        req.headers(),
        peer_ip(req),
        state.trust_proxy_headers,
    ) else {
        error!(
            remote_addr = %req.remote_addr(),
            "could not determine client address for rate limiting"
        );
        res.render(StatusError::internal_server_error());
        ctrl.skip_rest();

        return;
    };

    match state.limiter.check(client).await {
        Admission::Allowed => {
            ctrl.call_next(req, depot, res).await;
        }
        Admission::Limited { retry_after } => {
            warn!(%client, retry_after_ms = retry_after.as_millis(), "rate limit exceeded");
            observe_rate_limited();

            // Whole seconds, rounded up so an immediate retry is never advised.
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);

            if let Err(source) = res.add_header(RETRY_AFTER, seconds.max(1), true) {
                error!("failed to set retry-after header: {source}");
            }

            res.render(StatusError::too_many_requests().brief(RATE_LIMIT_MESSAGE));
            ctrl.skip_rest();
        }
    }
}

fn peer_ip(req: &Request) -> Option<IpAddr> {
    let remote = req.remote_addr();

    remote
        .as_ipv4()
        .map(|addr| IpAddr::V4(*addr.ip()))
        .or_else(|| remote.as_ipv6().map(|addr| IpAddr::V6(*addr.ip())))
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use dialed_in_app::rate_limit::{LimiterSettings, RateLimiterService};

    use crate::test_helpers::Mocks;

    use super::*;

    #[salvo::handler]
    async fn ok(res: &mut Response) {
        res.render("ok");
    }

    fn make_service(rps: f64, burst: u32) -> TestResult<Service> {
        let limiter = RateLimiterService::new(LimiterSettings {
            enabled: true,
            rps,
            burst,
            ..LimiterSettings::default()
        })?;

        let state = State::new(Mocks::default().into_app_context(), limiter)
            .with_trust_proxy_headers(true)
            .into_shared();

        Ok(Service::new(
            Router::new().hoop(inject(state)).hoop(handler).get(ok),
        ))
    }

    async fn get_from(service: &Service, client: &str) -> Response {
        TestClient::get("http://example.com")
            .add_header("x-forwarded-for", client, true)
            .send(service)
            .await
    }

    #[tokio::test]
    async fn second_request_inside_the_window_is_rejected() -> TestResult {
        let service = make_service(0.01, 1)?;

        let mut first = get_from(&service, "203.0.113.7").await;

        assert_eq!(first.status_code, Some(StatusCode::OK));
        assert_eq!(first.take_string().await?, "ok");

        let mut second = get_from(&service, "203.0.113.7").await;

        assert_eq!(second.status_code, Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(
            second.headers().contains_key(RETRY_AFTER),
            "expected a retry-after header"
        );
        assert!(
            second.take_string().await?.contains(RATE_LIMIT_MESSAGE),
            "expected the rate limit message"
        );

        Ok(())
    }

    #[tokio::test]
    async fn clients_are_limited_independently() -> TestResult {
        let service = make_service(0.01, 1)?;

        assert_eq!(
            get_from(&service, "203.0.113.7").await.status_code,
            Some(StatusCode::OK)
        );
        assert_eq!(
            get_from(&service, "203.0.113.7").await.status_code,
            Some(StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(
            get_from(&service, "198.51.100.2").await.status_code,
            Some(StatusCode::OK)
        );

        Ok(())
    }

    #[tokio::test]
    async fn unparseable_client_fails_closed() -> TestResult {
        let service = make_service(100.0, 10)?;

        let res = get_from(&service, "not-an-ip").await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn burst_is_admitted_before_limiting() -> TestResult {
        let service = make_service(0.01, 3)?;

        for attempt in 0..3 {
            assert_eq!(
                get_from(&service, "192.0.2.1").await.status_code,
                Some(StatusCode::OK),
                "attempt {attempt} should be inside the burst"
            );
        }

        assert_eq!(
            get_from(&service, "192.0.2.1").await.status_code,
            Some(StatusCode::TOO_MANY_REQUESTS)
        );

        Ok(())
    }
}
