//! State

use std::sync::Arc;

use dialed_in_app::{
    context::AppContext, domain::tokens::records::TokenLifetimes,
    rate_limit::RateLimiterService,
};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) limiter: RateLimiterService,
    pub(crate) lifetimes: TokenLifetimes,
    pub(crate) trust_proxy_headers: bool,
    pub(crate) environment: String,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, limiter: RateLimiterService) -> Self {
        Self {
            app,
            limiter,
            lifetimes: TokenLifetimes::default(),
            trust_proxy_headers: false,
            environment: "development".to_owned(),
        }
    }

    #[must_use]
    pub(crate) fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    #[must_use]
    pub(crate) fn with_trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    #[must_use]
    pub(crate) fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    #[must_use]
    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
