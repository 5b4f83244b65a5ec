// Shared test helpers: a scripted fetch strategy, fast configurations and
// mock sites.
//
// This module is pulled into the integration test files with `mod helpers;`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use httptest::{matchers::*, responders::*, Expectation, Server};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use site_posture::{FetchError, FetchMode, PageFetcher, RawPage, ScanConfig};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Fetch strategy that replays canned results and counts how often it ran.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<RawPage, FetchError>>>,
    calls: AtomicU32,
}

#[allow(dead_code)] // Used by other test files
impl ScriptedFetcher {
    pub fn new(script: Vec<Result<RawPage, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageFetcher for &ScriptedFetcher {
    async fn fetch(&self, _url: &Url, cancel: &CancellationToken) -> Result<RawPage, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or(Err(FetchError::Connection("script exhausted".into())))
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Static
    }
}

/// Configuration with no spacing and a short retry base so tests run quickly.
#[allow(dead_code)]
pub fn fast_config() -> ScanConfig {
    ScanConfig {
        contact_email: "tests@example.org".to_string(),
        min_delay: 0.0,
        max_delay: 0.0,
        timeout_seconds: 5.0,
        retry_base_delay_ms: 10,
        ..Default::default()
    }
}

/// A raw page as a fetch strategy would return it.
#[allow(dead_code)]
pub fn raw_page(final_url: &str, headers: &[(&'static str, &'static str)], body: &str) -> RawPage {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    RawPage {
        status_code: 200,
        headers: map,
        body: body.to_string(),
        final_url: final_url.to_string(),
        ssl_info: None,
        script_globals: Vec::new(),
    }
}

/// Mock site with the given robots.txt and no security.txt.
#[allow(dead_code)]
pub fn mock_site(robots: &'static str) -> Server {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/robots.txt"))
            .times(..)
            .respond_with(status_code(200).body(robots)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", matches("security\\.txt$")))
            .times(..)
            .respond_with(status_code(404)),
    );
    server
}
