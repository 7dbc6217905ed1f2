//! Per-client request quotas.
//!
//! Two keyed limiters: a default hourly quota for `/health` and `/weather/raw`
//! and a per-minute quota that replaces it on `/weather/current`. Clients are
//! keyed by peer IP.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Quota configuration. A zero quota disables that limiter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per hour per client on every route except /weather/current
    pub default_per_hour: u32,
    /// Requests per minute per client on /weather/current
    pub current_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_per_hour: 100,
            current_per_minute: 10,
        }
    }
}

impl RateLimitConfig {
    /// Sets the all-routes hourly quota.
    pub fn with_default_per_hour(mut self, n: u32) -> Self {
        self.default_per_hour = n;
        self
    }

    /// Sets the /weather/current per-minute quota.
    pub fn with_current_per_minute(mut self, n: u32) -> Self {
        self.current_per_minute = n;
        self
    }

    /// No quotas.
    pub fn unlimited() -> Self {
        Self {
            default_per_hour: 0,
            current_per_minute: 0,
        }
    }
}

/// Number of checks between sweeps of idle client entries.
const PRUNE_EVERY: usize = 1024;

/// Keyed limiters built from a [`RateLimitConfig`].
///
/// Each client IP gets an entry on first use. Entries whose quota has fully
/// replenished are dropped every [`PRUNE_EVERY`] checks.
pub struct RateLimits {
    default: Option<DefaultKeyedRateLimiter<IpAddr>>,
    current: Option<DefaultKeyedRateLimiter<IpAddr>>,
    checks: AtomicUsize,
}

impl RateLimits {
    /// Builds the limiters.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            default: NonZeroU32::new(config.default_per_hour)
                .map(|n| RateLimiter::keyed(Quota::per_hour(n))),
            current: NonZeroU32::new(config.current_per_minute)
                .map(|n| RateLimiter::keyed(Quota::per_minute(n))),
            checks: AtomicUsize::new(0),
        }
    }

    /// Takes one unit of the default quota. Returns false when exhausted.
    pub fn check_default(&self, client: IpAddr) -> bool {
        self.tick();
        self.default
            .as_ref()
            .map_or(true, |l| l.check_key(&client).is_ok())
    }

    /// Takes one unit of the /weather/current quota. Returns false when exhausted.
    pub fn check_current(&self, client: IpAddr) -> bool {
        self.tick();
        self.current
            .as_ref()
            .map_or(true, |l| l.check_key(&client).is_ok())
    }

    /// Drops entries for clients whose quota has fully replenished.
    pub fn prune(&self) {
        for limiter in [&self.default, &self.current].into_iter().flatten() {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Number of client entries held across both limiters.
    pub fn tracked_clients(&self) -> usize {
        [&self.default, &self.current]
            .into_iter()
            .flatten()
            .map(|l| l.len())
            .sum()
    }

    fn tick(&self) {
        let n = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if n % PRUNE_EVERY == 0 {
            self.prune();
            debug!(tracked = self.tracked_clients(), "Pruned idle rate-limit entries");
        }
    }
}

/// Peer IP, or the unspecified address when the server runs without connect info.
fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware enforcing the default quota.
pub async fn limit_default(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_ip(&req);
    if !state.limits.check_default(client) {
        debug!(%client, path = req.uri().path(), "Default quota exceeded");
        return ApiError::rate_limited().into_response();
    }
    next.run(req).await
}

/// Middleware enforcing the /weather/current quota.
pub async fn limit_current(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_ip(&req);
    if !state.limits.check_current(client) {
        debug!(%client, "Current-weather quota exceeded");
        return ApiError::rate_limited().into_response();
    }
    next.run(req).await
}
