//! Dialed-In JSON API Server

use std::process;

use salvo::{
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use dialed_in_app::{context::AppContext, rate_limit::RateLimiterService};

use crate::{config::ServerConfig, observability::Observability, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod coffees;
mod config;
mod errors;
mod extensions;
mod healthcheck;
mod mail;
mod observability;
mod rate_limit;
mod recipes;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod tokens;
mod users;

/// Dialed-In JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "tracing subscriber failed to initialise"
            )]
            {
                eprintln!("Observability error: {init_error}");
            }

            process::exit(1);
        }
    };

    let limiter = match RateLimiterService::new(config.limiter.settings()) {
        Ok(limiter) => limiter,
        Err(limiter_error) => {
            error!("invalid rate limiter settings: {limiter_error}");

            process::exit(1);
        }
    };

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        config.database.pool_settings(),
        config.database.db_run_migrations,
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    info!(
        environment = %config.server.environment,
        limiter_enabled = limiter.is_enabled(),
        "database connection pool established"
    );

    let state = State::new(app, limiter.clone())
        .with_lifetimes(config.tokens.lifetimes())
        .with_trust_proxy_headers(config.limiter.trust_proxy_headers)
        .with_environment(config.server.environment.clone())
        .into_shared();

    let router = router::app_router(config.observability.metrics_enabled);

    let doc = OpenApi::new("Dialed-In API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    // Service hoops also run for requests that match no route
    let service = router::with_request_gates(
        Service::new(router)
            .hoop(CatchPanic::new())
            .hoop(remove_slash())
            .hoop(observability::request_logging),
        state,
    );

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, limiter).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(service).await;

    info!("server stopped");

    observability.shutdown();
}
