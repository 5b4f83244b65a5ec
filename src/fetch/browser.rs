//! Dynamic fetch strategy: navigation in a headless Chromium.
//!
//! Each fetch launches its own browser and tears it down before returning, on
//! success, error, timeout and cancellation alike. A [`BrowserSession`] guard
//! also aborts the CDP handler task if the fetch future itself is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, Headers, ResourceType, SetExtraHttpHeadersParams,
};
use chromiumoxide::Page;
use futures::{FutureExt, StreamExt};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::request::RequestHeaders;
use super::{cap_body, PageFetcher, RawPage, SslInfo};
use crate::config::{
    FetchMode, ScanConfig, BROWSER_WINDOW_SIZE, MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE,
};
use crate::error_handling::{fetch_error_for_status, FetchError};
use crate::fingerprint::known_globals;
use crate::tls::normalize_protocol;

static LIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);

/// Number of browser sessions currently alive in this process.
pub fn live_browser_sessions() -> usize {
    LIVE_SESSIONS.load(Ordering::SeqCst)
}

/// Renders pages in a headless browser.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    user_agent: String,
    extra_headers: Vec<(String, String)>,
    timeout: Duration,
    settle: Duration,
    headless: bool,
}

impl BrowserFetcher {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            user_agent: config.user_agent(),
            extra_headers: RequestHeaders::browser_extra(config),
            timeout: config.timeout(),
            settle: Duration::from_millis(config.render_settle_ms),
            headless: config.headless,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, FetchError> {
        let (width, height) = BROWSER_WINDOW_SIZE;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(width, height)
            .request_timeout(self.timeout)
            .arg(format!("--user-agent={}", self.user_agent))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if !self.headless {
            builder = builder.with_head();
        }
        builder.build().map_err(FetchError::Browser)
    }

    async fn render(&self, browser: &Browser, url: &Url) -> Result<RawPage, FetchError> {
        let page = browser.new_page("about:blank").await.map_err(browser_error)?;
        let result = self.render_page(&page, url).await;
        if let Err(e) = page.close().await {
            debug!("Closing page for {url} failed: {e}");
        }
        result
    }

    async fn render_page(&self, page: &Page, url: &Url) -> Result<RawPage, FetchError> {
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(browser_error)?;

        let extra: serde_json::Map<String, serde_json::Value> = self
            .extra_headers
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            serde_json::Value::Object(extra),
        )))
        .await
        .map_err(browser_error)?;

        page.goto(url.as_str())
            .await
            .map_err(|e| categorize_navigation_error(&e.to_string(), self.timeout))?;
        tokio::time::sleep(self.settle).await;

        let main_frame = page.mainframe().await.ok().flatten();
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        // events already delivered; the last main-frame document is the final one
        let mut document = None;
        while let Some(Some(event)) = responses.next().now_or_never() {
            if event.r#type != ResourceType::Document {
                continue;
            }
            if let (Some(main), Some(frame)) = (&main_frame, &event.frame_id) {
                if main != frame {
                    continue;
                }
            }
            document = Some(event);
        }
        let document = document.ok_or_else(|| {
            FetchError::Browser("no response received for the main document".to_string())
        })?;

        let status = document_status(document.response.status)?;
        let headers = header_map_from_cdp(document.response.headers.inner());
        debug!("Rendered {url} -> {status} (final url {final_url})");
        if let Some(err) = fetch_error_for_status(status, &headers) {
            return Err(err);
        }

        let body = cap_body(
            page.content().await.map_err(browser_error)?,
            MAX_RESPONSE_BODY_SIZE,
        );

        let script_globals = match serde_json::to_string(&known_globals()) {
            Ok(names) => {
                let js = format!("{names}.filter(n => typeof window[n] !== 'undefined')");
                match page.evaluate(js).await {
                    Ok(value) => value.into_value::<Vec<String>>().unwrap_or_default(),
                    Err(e) => {
                        warn!("Could not read script globals for {final_url}: {e}");
                        Vec::new()
                    }
                }
            }
            Err(_) => Vec::new(),
        };

        let ssl_info = final_url.starts_with("https://").then(|| {
            let details = document.response.security_details.as_ref();
            SslInfo {
                verified: true,
                issuer: details
                    .map(|d| d.issuer.trim().to_string())
                    .filter(|s| !s.is_empty()),
                protocol: details.map(|d| normalize_protocol(&d.protocol)),
            }
        });

        Ok(RawPage {
            status_code: status,
            headers,
            body,
            final_url,
            ssl_info,
            script_globals,
        })
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<RawPage, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        let config = self.browser_config()?;

        let session = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            launched = tokio::time::timeout(self.timeout, BrowserSession::launch(config)) => {
                launched.unwrap_or(Err(FetchError::Timeout(self.timeout)))?
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            rendered = tokio::time::timeout(self.timeout, self.render(&session.browser, url)) => {
                rendered.unwrap_or(Err(FetchError::Timeout(self.timeout)))
            }
        };

        session.close().await;
        outcome
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Dynamic
    }
}

/// A launched browser plus the task driving its CDP connection.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self, FetchError> {
        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
        });
        LIVE_SESSIONS.fetch_add(1, Ordering::SeqCst);
        debug!("Browser session started");
        Ok(Self { browser, handler })
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Waiting for browser exit failed: {e}");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        LIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst);
        debug!("Browser session released");
    }
}

fn browser_error(e: impl std::fmt::Display) -> FetchError {
    FetchError::Browser(e.to_string())
}

/// Maps a Chromium navigation error (`net::ERR_*`) onto a `FetchError`.
pub fn categorize_navigation_error(message: &str, timeout: Duration) -> FetchError {
    let upper = message.to_ascii_uppercase();
    if upper.contains("ERR_CERT") || upper.contains("ERR_SSL") {
        FetchError::Ssl(message.to_string())
    } else if upper.contains("ERR_TOO_MANY_REDIRECTS") {
        FetchError::TooManyRedirects(MAX_REDIRECT_HOPS)
    } else if upper.contains("ERR_TIMED_OUT") || upper.contains("TIMEOUT") {
        FetchError::Timeout(timeout)
    } else if [
        "ERR_CONNECTION",
        "ERR_NAME_NOT_RESOLVED",
        "ERR_ADDRESS_UNREACHABLE",
        "ERR_INTERNET_DISCONNECTED",
        "ERR_NETWORK_CHANGED",
        "ERR_EMPTY_RESPONSE",
    ]
    .iter()
    .any(|code| upper.contains(code))
    {
        FetchError::Connection(message.to_string())
    } else {
        FetchError::Browser(message.to_string())
    }
}

/// Converts the CDP header object (`{"name": "v1\nv2"}`) into a `HeaderMap`.
/// Names or values that are not valid HTTP tokens are dropped.
fn header_map_from_cdp(value: &serde_json::Value) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(object) = value.as_object() else {
        return headers;
    };
    for (name, raw) in object {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            continue;
        };
        let Some(raw) = raw.as_str() else {
            continue;
        };
        for part in raw.split('\n') {
            if let Ok(value) = HeaderValue::from_str(part.trim()) {
                headers.append(name.clone(), value);
            }
        }
    }
    headers
}

/// Validates the status CDP reported for the main document.
fn document_status(status: i64) -> Result<u16, FetchError> {
    u16::try_from(status)
        .ok()
        .filter(|code| (100..1000).contains(code))
        .ok_or_else(|| FetchError::Browser(format!("invalid status {status} for main document")))
}
