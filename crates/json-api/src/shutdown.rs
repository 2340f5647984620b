//! Signal driven shutdown.
//!
//! On SIGINT or SIGTERM the limiter sweeper is stopped and the server drains
//! in-flight requests before `serve` returns.

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

use dialed_in_app::rate_limit::RateLimiterService;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install SIGINT handler: {0}")]
    Interrupt(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    Terminate(#[source] io::Error),
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::Terminate)?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending().await
}

pub(crate) async fn listen(
    handle: ServerHandle,
    limiter: RateLimiterService,
) -> Result<(), ShutdownSignalError> {
    let signal = tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::Interrupt)?;
            "SIGINT"
        }
        result = terminate() => {
            result?;
            "SIGTERM"
        }
    };

    info!(signal, "shutting down server");

    limiter.shutdown();
    handle.stop_graceful(None);

    Ok(())
}
