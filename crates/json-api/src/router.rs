//! App Router

use std::sync::Arc;

use salvo::{Router, Service, affix_state::inject};

use crate::{
    auth::{
        self,
        guards::{require_activated, require_authenticated},
    },
    coffees, healthcheck,
    observability::metrics_handler,
    rate_limit, recipes,
    state::State,
    tokens, users,
};

/// Versioned API routes and, when enabled, the metrics endpoint.
pub fn app_router(metrics_enabled: bool) -> Router {
    let v1 = Router::with_path("v1")
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("methods").get(recipes::methods::handler))
        .push(
            Router::with_path("users")
                .post(users::register::handler)
                .push(Router::with_path("activated").put(users::activate::handler))
                .push(Router::with_path("password").put(users::reset_password::handler))
                .push(
                    Router::with_path("verify")
                        .hoop(require_authenticated)
                        .get(users::verify::handler),
                )
                .push(
                    Router::with_path("me")
                        .hoop(require_activated)
                        .patch(users::update::handler),
                ),
        )
        .push(
            Router::with_path("tokens")
                .push(Router::with_path("authentication").post(tokens::authentication::handler))
                .push(Router::with_path("activation").post(tokens::activation::handler))
                .push(Router::with_path("password-reset").post(tokens::password_reset::handler)),
        )
        .push(
            Router::with_path("coffees")
                .hoop(require_authenticated)
                .get(coffees::index::handler)
                .post(coffees::create::handler)
                .push(
                    Router::with_path("{coffee}")
                        .get(coffees::get::handler)
                        .put(coffees::update::handler)
                        .delete(coffees::delete::handler),
                ),
        )
        .push(
            Router::with_path("recipes")
                .hoop(require_authenticated)
                .get(recipes::index::handler)
                .post(recipes::create::handler)
                .push(
                    Router::with_path("{recipe}")
                        .get(recipes::get::handler)
                        .put(recipes::update::handler)
                        .delete(recipes::delete::handler),
                ),
        );

    let router = Router::new().push(v1);

    if metrics_enabled {
        router.push(Router::with_path("debug/metrics").get(metrics_handler))
    } else {
        router
    }
}

/// Attach state, the rate limiter and the authenticator to `service`.
///
/// Service hoops run whether or not a route matches, so unknown paths and
/// methods still draw from the caller's bucket. The limiter runs before the
/// authenticator so rejected traffic never reaches token lookup.
pub(crate) fn with_request_gates(service: Service, state: Arc<State>) -> Service {
    service
        .hoop(inject(state))
        .hoop(rate_limit::middleware::handler)
        .hoop(auth::middleware::handler)
}
