//! Rate limiter service.
//!
//! One [`RateLimiterService`] is built at process start and shared by handle
//! with the request pipeline. It owns the per-client bucket map and, when
//! enabled, a background task that evicts clients idle for longer than the
//! configured expiration.

use std::{collections::HashMap, net::IpAddr, sync::Arc, time::Duration};

use tokio::{
    select,
    sync::{Mutex, watch},
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, info};

use crate::rate_limit::bucket::{RateLimitConfig, RateLimitConfigError, TokenBucket};

/// Default steady refill rate, in requests per second.
pub const DEFAULT_RPS: f64 = 2.0;

/// Default bucket capacity.
pub const DEFAULT_BURST: u32 = 4;

/// Default idle window after which a client's state is evicted.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(3 * 60);

/// Default period of the eviction sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterSettings {
    pub enabled: bool,
    pub rps: f64,
    pub burst: u32,
    pub expiration: Duration,
    pub sweep_interval: Duration,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rps: DEFAULT_RPS,
            burst: DEFAULT_BURST,
            expiration: DEFAULT_EXPIRATION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Limited { retry_after: Duration },
}

#[derive(Debug)]
struct ClientRateState {
    bucket: TokenBucket,
    last_seen: Instant,
}

type ClientMap = HashMap<IpAddr, ClientRateState>;

/// Stops the sweeper when the last service handle is dropped.
#[derive(Debug)]
struct SweeperGuard {
    shutdown_tx: watch::Sender<bool>,
}

impl Drop for SweeperGuard {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct RateLimiterService {
    config: Option<RateLimitConfig>,
    expiration: Duration,
    clients: Arc<Mutex<ClientMap>>,
    sweeper: Option<Arc<SweeperGuard>>,
}

impl RateLimiterService {
    /// Build the limiter and, when enabled, spawn its eviction sweeper.
    ///
    /// Must be called from within a Tokio runtime when `settings.enabled`.
    ///
    /// # Errors
    ///
    /// Returns an error when the rate or burst settings are invalid.
    pub fn new(settings: LimiterSettings) -> Result<Self, RateLimitConfigError> {
        if !settings.enabled {
            info!("rate limiter disabled");

            return Ok(Self {
                config: None,
                expiration: settings.expiration,
                clients: Arc::default(),
                sweeper: None,
            });
        }

        let config = RateLimitConfig::new(settings.rps, settings.burst)?;
        let clients: Arc<Mutex<ClientMap>> = Arc::default();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(run_sweeper(
            Arc::clone(&clients),
            settings.expiration,
            settings.sweep_interval,
            shutdown_rx,
        ));

        info!(
            rps = config.rps(),
            burst = config.burst(),
            expiration_secs = settings.expiration.as_secs(),
            "rate limiter enabled"
        );

        Ok(Self {
            config: Some(config),
            expiration: settings.expiration,
            clients,
            sweeper: Some(Arc::new(SweeperGuard { shutdown_tx })),
        })
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Admit or reject one request from `client`.
    ///
    /// Lookup-or-create, the `last_seen` update and the bucket withdrawal all
    /// happen under one lock acquisition.
    pub async fn check(&self, client: IpAddr) -> Admission {
        let Some(config) = self.config else {
            return Admission::Allowed;
        };

        let now = Instant::now();
        let mut clients = self.clients.lock().await;

        let state = clients.entry(client).or_insert_with(|| ClientRateState {
            bucket: TokenBucket::full(config, now),
            last_seen: now,
        });

        state.last_seen = now;

        match state.bucket.try_acquire(config, now) {
            Ok(()) => Admission::Allowed,
            Err(retry_after) => Admission::Limited { retry_after },
        }
    }

    /// Evict every client idle for longer than the expiration window,
    /// returning how many were removed.
    pub async fn sweep(&self) -> usize {
        sweep(&self.clients, self.expiration).await
    }

    /// Number of clients currently holding limiter state.
    pub async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Signal the eviction sweeper to stop. Idempotent.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.shutdown_tx.send_replace(true);
        }
    }
}

async fn sweep(clients: &Mutex<ClientMap>, expiration: Duration) -> usize {
    let now = Instant::now();
    let mut clients = clients.lock().await;
    let before = clients.len();

    clients.retain(|_, state| now.saturating_duration_since(state.last_seen) <= expiration);

    before - clients.len()
}

async fn run_sweeper(
    clients: Arc<Mutex<ClientMap>>,
    expiration: Duration,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        select! {
            _ = ticker.tick() => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("rate limiter sweeper stopped");
                    return;
                }
                continue;
            }
        }

        let evicted = sweep(&clients, expiration).await;

        if evicted > 0 {
            debug!(evicted, "evicted idle rate limiter clients");
        }
    }
}
