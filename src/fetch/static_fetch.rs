//! Static fetch strategy: a single HTTP GET.

use std::time::Duration;

use log::{debug, warn};
use reqwest::tls::TlsInfo;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{cap_body, PageFetcher, RawPage, SslInfo};
use crate::config::{FetchMode, ScanConfig, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{categorize_reqwest_error, fetch_error_for_status, FetchError};
use crate::tls::{issuer_from_der, probe_tls};

/// Fetches pages with the shared `reqwest` client.
///
/// The client is expected to carry the identifying headers, the redirect limit
/// and `tls_info(true)` (see `initialization::init_client`).
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl StaticFetcher {
    pub fn new(client: reqwest::Client, config: &ScanConfig) -> Self {
        Self {
            client,
            timeout: config.timeout(),
        }
    }

    async fn fetch_inner(&self, url: &Url) -> Result<RawPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e, self.timeout))?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        debug!("GET {url} -> {status} (final url {final_url})");

        if let Some(err) = fetch_error_for_status(status, &headers) {
            return Err(err);
        }

        let peer_certificate = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(|info| info.peer_certificate())
            .map(<[u8]>::to_vec);

        let body = response
            .text()
            .await
            .map_err(|e| categorize_reqwest_error(&e, self.timeout))?;
        let body = cap_body(body, MAX_RESPONSE_BODY_SIZE);

        let ssl_info = if final_url.scheme() == "https" {
            Some(ssl_info_for(&final_url, peer_certificate.as_deref()).await)
        } else {
            None
        };

        Ok(RawPage {
            status_code: status,
            headers,
            body,
            final_url: final_url.to_string(),
            ssl_info,
            script_globals: Vec::new(),
        })
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<RawPage, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.fetch_inner(url) => result,
        }
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Static
    }
}

/// A completed https exchange means the chain verified; issuer and protocol
/// are best effort.
async fn ssl_info_for(final_url: &Url, peer_certificate: Option<&[u8]>) -> SslInfo {
    let mut issuer = peer_certificate.and_then(issuer_from_der);
    let mut protocol = None;

    if let (Some(host), Some(port)) = (final_url.host_str(), final_url.port_or_known_default()) {
        match probe_tls(host, port).await {
            Ok(probe) => {
                protocol = probe.protocol;
                issuer = issuer.or(probe.issuer);
            }
            Err(e) => warn!("TLS probe failed for {final_url}: {e}"),
        }
    }

    SslInfo {
        verified: true,
        issuer,
        protocol,
    }
}
