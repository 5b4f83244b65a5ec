//! Page fetching.
//!
//! Two strategies produce the same [`RawPage`] shape:
//! - [`StaticFetcher`]: one HTTP GET through the shared `reqwest` client
//! - [`BrowserFetcher`]: navigation in a headless Chromium, scripts executed
//!
//! The strategy is chosen by `ScanConfig::mode` through [`FetchEngine`] and is
//! never switched based on page content. Both report failures as
//! [`FetchError`] so the retry controller treats them alike.

mod browser;
pub(crate) mod request;
mod static_fetch;

use std::future::Future;

use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{FetchMode, ScanConfig};
use crate::error_handling::FetchError;

pub use browser::{categorize_navigation_error, live_browser_sessions, BrowserFetcher};
pub use static_fetch::StaticFetcher;

/// TLS details of the connection that served the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslInfo {
    /// The certificate chain validated without any override
    pub verified: bool,
    pub issuer: Option<String>,
    /// Normalized protocol name, e.g. "TLSv1.3"
    pub protocol: Option<String>,
}

/// Uniform result of either fetch strategy.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub status_code: u16,
    pub headers: HeaderMap,
    /// Response body (static) or rendered DOM (dynamic)
    pub body: String,
    /// URL after redirects
    pub final_url: String,
    /// Present only when `final_url` is https
    pub ssl_info: Option<SslInfo>,
    /// JavaScript globals observed at runtime; always empty for static fetches
    pub script_globals: Vec<String>,
}

/// A way of turning a URL into a [`RawPage`].
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` once. Implementations must return promptly with
    /// `FetchError::Cancelled` when `cancel` fires.
    fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<RawPage, FetchError>> + Send;

    /// Mode reported on the scan report.
    fn mode(&self) -> FetchMode;
}

/// The configured fetch strategy.
#[derive(Debug, Clone)]
pub enum FetchEngine {
    Static(StaticFetcher),
    Dynamic(BrowserFetcher),
}

impl FetchEngine {
    /// Selects the strategy named by `config.mode`.
    pub fn from_config(client: reqwest::Client, config: &ScanConfig) -> Self {
        match config.mode {
            FetchMode::Static => FetchEngine::Static(StaticFetcher::new(client, config)),
            FetchMode::Dynamic => FetchEngine::Dynamic(BrowserFetcher::new(config)),
        }
    }
}

impl PageFetcher for FetchEngine {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<RawPage, FetchError> {
        match self {
            FetchEngine::Static(fetcher) => fetcher.fetch(url, cancel).await,
            FetchEngine::Dynamic(fetcher) => fetcher.fetch(url, cancel).await,
        }
    }

    fn mode(&self) -> FetchMode {
        match self {
            FetchEngine::Static(_) => FetchMode::Static,
            FetchEngine::Dynamic(_) => FetchMode::Dynamic,
        }
    }
}

/// Truncates `body` to at most `max` bytes on a character boundary.
pub(crate) fn cap_body(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        log::debug!("Truncating body from {} to {end} bytes", body.len());
        body.truncate(end);
    }
    body
}
