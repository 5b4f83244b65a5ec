//! HTTP client initialization.
//!
//! One client is shared by the policy gate, the static fetch strategy and the
//! security.txt probe, so every request carries the same identification.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{ScanConfig, MAX_REDIRECT_HOPS};
use crate::error_handling::InitializationError;
use crate::fetch::request::RequestHeaders;

/// Initializes the HTTP client for a scan configuration.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent and `From` headers carrying the contact address
/// - Timeout from the configuration
/// - Redirect following (up to `MAX_REDIRECT_HOPS`)
/// - TLS certificate verification on, with no way to turn it off
/// - Peer certificate capture (`tls_info`) for SSL reporting
///
/// # Errors
///
/// Returns `InitializationError::ConfigError` if the contact address cannot be
/// sent as a header, or `HttpClientError` if the client cannot be built.
pub fn init_client(config: &ScanConfig) -> Result<reqwest::Client, InitializationError> {
    let headers = RequestHeaders::identifying(config)?;
    let client = ClientBuilder::new()
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(Duration::from_secs(10)))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .tls_info(true)
        .use_rustls_tls()
        .build()?;
    Ok(client)
}
