//! Compliance gate in front of every fetch.
//!
//! This module provides:
//! - robots.txt retrieval, parsing and evaluation (`RobotsPolicy`)
//! - per-domain request spacing with backoff (`RateLimiter`)
//! - the `PolicyGate` that combines both into an allow/deny decision
//!
//! Robots policies are cached per origin and pacing state per registrable
//! domain, both for the lifetime of the `DomainRegistry` that owns them.

mod rate_limiter;
mod robots;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{RobotsFailureMode, ScanConfig, MAX_ROBOTS_TXT_SIZE, PRODUCT_TOKEN};
use crate::domain::domain_key;
use crate::error_handling::FetchError;

pub use rate_limiter::{scaled_spacing, DomainPermit, RateLimiter, RateLimiterState, Spacing};
pub use robots::RobotsPolicy;

/// Why a scan was refused before any page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// A robots.txt rule disallows the path (path and query as requested)
    Disallowed { path: String },
    /// robots.txt could not be read and the gate is configured to fail closed
    RobotsUnreachable(String),
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::Disallowed { path } => {
                write!(f, "robots.txt disallows {path} for {PRODUCT_TOKEN}")
            }
            DenyReason::RobotsUnreachable(detail) => {
                write!(f, "robots.txt unreachable and policy is fail-closed: {detail}")
            }
        }
    }
}

/// Outcome of [`PolicyGate::check`].
#[derive(Debug)]
pub enum Decision {
    /// Proceed. The permit holds the domain until dropped.
    Allow(DomainPermit),
    Deny(DenyReason),
}

/// Cached result of reading one origin's robots.txt.
#[derive(Debug, Clone)]
enum RobotsEntry {
    Policy(Arc<RobotsPolicy>),
    Unreachable(String),
}

/// Per-domain state shared by every scan of one `Scanner`.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    robots: Mutex<HashMap<String, RobotsEntry>>,
    limiter: RateLimiter,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Cached robots policy for the origin of `url`, if one was read.
    pub async fn cached_robots(&self, url: &Url) -> Option<Arc<RobotsPolicy>> {
        match self.robots.lock().await.get(&origin_key(url)) {
            Some(RobotsEntry::Policy(policy)) => Some(Arc::clone(policy)),
            _ => None,
        }
    }
}

/// Decides whether a URL may be fetched and paces requests per domain.
#[derive(Debug, Clone)]
pub struct PolicyGate {
    client: reqwest::Client,
    registry: Arc<DomainRegistry>,
}

impl PolicyGate {
    pub fn new(client: reqwest::Client, registry: Arc<DomainRegistry>) -> Self {
        Self { client, registry }
    }

    /// Checks robots.txt for `url` and, on Allow, waits for the domain's turn.
    ///
    /// The returned permit must be held for the duration of the fetch (and any
    /// retries) so no other request to the domain runs concurrently.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Cancelled` if `cancel` fires while waiting.
    pub async fn check(
        &self,
        url: &Url,
        config: &ScanConfig,
        cancel: &CancellationToken,
    ) -> Result<Decision, FetchError> {
        let domain = domain_key(url).unwrap_or_else(|| url.as_str().to_string());
        let mut permit = self.registry.limiter.acquire(&domain, cancel).await?;
        let spacing = Spacing::from_config(config);

        if !config.respect_robots {
            debug!("robots.txt ignored for {url} by configuration");
            permit.wait_turn(&spacing, cancel).await?;
            return Ok(Decision::Allow(permit));
        }

        let entry = self
            .robots_entry(url, config, &spacing, &mut permit, cancel)
            .await?;

        let crawl_delay = match entry {
            RobotsEntry::Policy(policy) => {
                if !policy.allows(url.as_str()) {
                    let path = match url.query() {
                        Some(query) => format!("{}?{query}", url.path()),
                        None => url.path().to_string(),
                    };
                    info!("robots.txt disallows {url}");
                    return Ok(Decision::Deny(DenyReason::Disallowed { path }));
                }
                debug!("robots.txt allows {url}");
                policy.crawl_delay()
            }
            RobotsEntry::Unreachable(detail) => match config.robots_unreachable {
                RobotsFailureMode::Deny => {
                    warn!("robots.txt for {url} unreachable, denying: {detail}");
                    return Ok(Decision::Deny(DenyReason::RobotsUnreachable(detail)));
                }
                RobotsFailureMode::Allow => {
                    warn!("robots.txt for {url} unreachable, proceeding without rules: {detail}");
                    None
                }
            },
        };

        permit
            .wait_turn(&spacing.with_floor(crawl_delay), cancel)
            .await?;
        Ok(Decision::Allow(permit))
    }

    async fn robots_entry(
        &self,
        url: &Url,
        config: &ScanConfig,
        spacing: &Spacing,
        permit: &mut DomainPermit,
        cancel: &CancellationToken,
    ) -> Result<RobotsEntry, FetchError> {
        let key = origin_key(url);
        if let Some(entry) = self.registry.robots.lock().await.get(&key) {
            return Ok(entry.clone());
        }

        // the robots.txt read is itself a request to the domain
        permit.wait_turn(spacing, cancel).await?;
        let entry = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            entry = fetch_robots(&self.client, url, config) => entry,
        };
        self.registry.robots.lock().await.insert(key, entry.clone());
        Ok(entry)
    }
}

fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}

async fn fetch_robots(client: &reqwest::Client, url: &Url, config: &ScanConfig) -> RobotsEntry {
    let host = url.host_str().unwrap_or_default().to_string();
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => return RobotsEntry::Unreachable(e.to_string()),
    };
    debug!("Fetching {robots_url}");

    let response = match client.get(robots_url.clone()).timeout(config.timeout()).send().await {
        Ok(response) => response,
        Err(e) => return RobotsEntry::Unreachable(e.to_string()),
    };

    let status = response.status();
    if status.is_client_error() {
        debug!("{robots_url} returned {status}, treating as no rules");
        return RobotsEntry::Policy(Arc::new(RobotsPolicy::allow_all(&host)));
    }
    if !status.is_success() {
        return RobotsEntry::Unreachable(format!("{robots_url} returned {status}"));
    }

    match response.bytes().await {
        Ok(bytes) => {
            let capped = &bytes[..bytes.len().min(MAX_ROBOTS_TXT_SIZE)];
            let policy = RobotsPolicy::parse(&host, PRODUCT_TOKEN, capped);
            debug!("Parsed robots.txt for {host}: {policy:?}");
            RobotsEntry::Policy(Arc::new(policy))
        }
        Err(e) => RobotsEntry::Unreachable(e.to_string()),
    }
}
