//! Per-domain request spacing.
//!
//! Each domain gets its own `RateLimiterState` behind an async mutex. A caller
//! holds the domain's [`DomainPermit`] from the spacing wait through the end of
//! its request, so at most one request per domain is in flight and the spacing
//! is measured between request starts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rand::Rng;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::{ScanConfig, MAX_BACKOFF_LEVEL, MAX_SPACING_SECS};
use crate::error_handling::FetchError;

/// Mutable per-domain pacing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimiterState {
    /// Start of the most recent request to the domain
    pub last_request_at: Option<Instant>,
    /// Number of consecutive transient failures, capped at `MAX_BACKOFF_LEVEL`
    pub backoff_level: u32,
}

/// Bounds of the randomized inter-request delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub min: Duration,
    pub max: Duration,
    /// Lower bound imposed by robots `Crawl-delay`
    pub floor: Option<Duration>,
}

impl Spacing {
    /// Bounds from the configured delays. Values outside `Duration` range are
    /// rejected by `ScanConfig::validate`; here they fall back to zero.
    pub fn from_config(config: &ScanConfig) -> Self {
        let min = Duration::try_from_secs_f64(config.min_delay).unwrap_or_default();
        let max = Duration::try_from_secs_f64(config.max_delay).unwrap_or_default();
        Self {
            min,
            max: max.max(min),
            floor: None,
        }
    }

    pub fn with_floor(mut self, floor: Option<Duration>) -> Self {
        self.floor = floor;
        self
    }

    /// Draws a delay from `[min, max]` with a triangular distribution peaking
    /// at the midpoint, then raises it to the crawl-delay floor.
    pub fn draw(&self) -> Duration {
        let mut rng = rand::rng();
        let (min, max) = (self.min.as_secs_f64(), self.max.as_secs_f64());
        let drawn = if max > min {
            let u = (rng.random::<f64>() + rng.random::<f64>()) / 2.0;
            min + u * (max - min)
        } else {
            min
        };
        let drawn = Duration::from_secs_f64(drawn);
        match self.floor {
            Some(floor) if floor > drawn => floor,
            _ => drawn,
        }
    }
}

/// Scales a base delay by the backoff level.
///
/// Only the growth from backoff is capped at `MAX_SPACING_SECS`; the result
/// never drops below `base`, so configured delays and `Crawl-delay` floors
/// above the cap are kept as they are.
pub fn scaled_spacing(base: Duration, backoff_level: u32) -> Duration {
    let factor = 2f64.powi(backoff_level.min(MAX_BACKOFF_LEVEL) as i32);
    let scaled = (base.as_secs_f64() * factor).min(MAX_SPACING_SECS);
    base.max(Duration::from_secs_f64(scaled))
}

/// Registry of per-domain pacing state.
#[derive(Debug, Default)]
pub struct RateLimiter {
    domains: Mutex<HashMap<String, Arc<Mutex<RateLimiterState>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `domain`.
    ///
    /// Returns `FetchError::Cancelled` if `cancel` fires first.
    pub async fn acquire(
        &self,
        domain: &str,
        cancel: &CancellationToken,
    ) -> Result<DomainPermit, FetchError> {
        let slot = {
            let mut domains = self.domains.lock().await;
            Arc::clone(domains.entry(domain.to_string()).or_default())
        };
        let guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            guard = slot.lock_owned() => guard,
        };
        Ok(DomainPermit {
            domain: domain.to_string(),
            state: guard,
        })
    }

    /// Current state of `domain`, or `None` if it was never used or is busy.
    pub async fn snapshot(&self, domain: &str) -> Option<RateLimiterState> {
        let slot = self.domains.lock().await.get(domain).cloned()?;
        let state = slot.try_lock().ok().map(|s| *s);
        state
    }
}

/// Exclusive handle on one domain's pacing state.
///
/// Dropping the permit lets the next caller for the domain proceed.
#[derive(Debug)]
pub struct DomainPermit {
    domain: String,
    state: OwnedMutexGuard<RateLimiterState>,
}

impl DomainPermit {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn state(&self) -> RateLimiterState {
        *self.state
    }

    /// Marks the start of a request to the domain.
    pub fn record_request(&mut self) {
        self.state.last_request_at = Some(Instant::now());
    }

    /// Raises the backoff level after a transient failure.
    pub fn record_failure(&mut self) {
        self.state.backoff_level = (self.state.backoff_level + 1).min(MAX_BACKOFF_LEVEL);
        debug!(
            "Backoff level for {} raised to {}",
            self.domain, self.state.backoff_level
        );
    }

    /// Resets the backoff level after a successful response.
    pub fn record_success(&mut self) {
        if self.state.backoff_level > 0 {
            debug!("Backoff level for {} reset", self.domain);
        }
        self.state.backoff_level = 0;
    }

    /// Blocks until the spacing since the domain's last request has elapsed,
    /// then records the new request.
    ///
    /// The first request to a domain does not wait.
    ///
    /// # Returns
    ///
    /// The time actually spent waiting.
    pub async fn wait_turn(
        &mut self,
        spacing: &Spacing,
        cancel: &CancellationToken,
    ) -> Result<Duration, FetchError> {
        let mut waited = Duration::ZERO;
        if let Some(last) = self.state.last_request_at {
            let required = scaled_spacing(spacing.draw(), self.state.backoff_level);
            let ready_at = last + required;
            let now = Instant::now();
            if ready_at > now {
                waited = ready_at - now;
                debug!(
                    "Waiting {:.2}s before next request to {} (backoff level {})",
                    waited.as_secs_f64(),
                    self.domain,
                    self.state.backoff_level
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                    _ = tokio::time::sleep_until(ready_at) => {}
                }
            }
        }
        self.record_request();
        Ok(waited)
    }
}
