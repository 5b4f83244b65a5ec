//! Scan orchestration.
//!
//! A [`Scanner`] runs one URL through the whole pipeline:
//! validate -> policy gate -> fetch with retries -> extraction ->
//! security.txt probe -> report.
//!
//! The scanner owns the HTTP client and the per-domain state (robots cache and
//! rate limiter), so every scan made through one scanner shares them. Scans of
//! the same domain are serialized; the domain permit is held from the spacing
//! wait until the last request of the scan has finished.

mod state;

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::app::parse_scan_url;
use crate::config::ScanConfig;
use crate::error_handling::{ExtractionWarning, FetchError, InitializationError, ScanError};
use crate::fetch::{FetchEngine, PageFetcher};
use crate::initialization::init_client;
use crate::models::{SecurityReport, SecurityTxt};
use crate::parse::{parse, probe_security_txt};
use crate::policy::{Decision, DomainRegistry, PolicyGate};
use crate::utils::RetryController;

pub use state::ScanState;

/// Runs scans with shared per-domain state.
///
/// # Examples
///
/// ```no_run
/// use site_posture::{ScanConfig, Scanner};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let scanner = Scanner::new(ScanConfig::default())?;
/// let report = scanner.scan("https://example.com").await?;
/// println!("{} missing headers", report.missing_important_headers.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Scanner<F = FetchEngine> {
    config: ScanConfig,
    client: reqwest::Client,
    registry: Arc<DomainRegistry>,
    gate: PolicyGate,
    retry: RetryController,
    fetcher: F,
}

impl Scanner<FetchEngine> {
    /// Builds a scanner using the fetch strategy named by `config.mode`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ScanConfig) -> Result<Self, InitializationError> {
        config.validate()?;
        let client = init_client(&config)?;
        let fetcher = FetchEngine::from_config(client.clone(), &config);
        Ok(Self::assemble(config, client, fetcher))
    }
}

impl<F: PageFetcher> Scanner<F> {
    /// Builds a scanner around a caller-supplied fetch strategy.
    ///
    /// The robots.txt and security.txt requests still go through the
    /// scanner's own identifying client.
    pub fn with_fetcher(config: ScanConfig, fetcher: F) -> Result<Self, InitializationError> {
        config.validate()?;
        let client = init_client(&config)?;
        Ok(Self::assemble(config, client, fetcher))
    }

    fn assemble(config: ScanConfig, client: reqwest::Client, fetcher: F) -> Self {
        let registry = Arc::new(DomainRegistry::new());
        Self {
            gate: PolicyGate::new(client.clone(), Arc::clone(&registry)),
            retry: RetryController::from_config(&config),
            config,
            client,
            registry,
            fetcher,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Per-domain state shared by this scanner's scans.
    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    /// Scans `url` without external cancellation.
    pub async fn scan(&self, url: &str) -> Result<SecurityReport, ScanError> {
        self.scan_with_cancel(url, &CancellationToken::new()).await
    }

    /// Scans `url`, aborting promptly when `cancel` fires.
    ///
    /// # Errors
    ///
    /// - `ScanError::Config` for a malformed or non-http(s) URL
    /// - `ScanError::PolicyDenied` when robots.txt forbids the path (no page fetch is made)
    /// - `ScanError::FetchFailed` when the fetch fails permanently, retries run
    ///   out, or the scan is cancelled
    pub async fn scan_with_cancel(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<SecurityReport, ScanError> {
        let mut lifecycle = Lifecycle::new(input);

        let url = match parse_scan_url(input) {
            Ok(url) => url,
            Err(source) => {
                lifecycle.advance(ScanState::Failed);
                return Err(ScanError::Config {
                    url: input.to_string(),
                    source,
                });
            }
        };

        lifecycle.advance(ScanState::PolicyCheck);
        let mut permit = match self.gate.check(&url, &self.config, cancel).await {
            Ok(Decision::Allow(permit)) => permit,
            Ok(Decision::Deny(reason)) => {
                lifecycle.advance(ScanState::Denied);
                return Err(ScanError::PolicyDenied {
                    url: input.to_string(),
                    reason,
                });
            }
            Err(source) => {
                lifecycle.advance(ScanState::Failed);
                return Err(ScanError::FetchFailed {
                    url: input.to_string(),
                    attempts: 0,
                    source,
                });
            }
        };

        lifecycle.advance(ScanState::Fetching);
        let fetcher = &self.fetcher;
        let target = &url;
        let outcome = self
            .retry
            .run(&mut permit, cancel, |attempt| {
                if attempt > 1 {
                    lifecycle.advance(ScanState::Retrying);
                    lifecycle.advance(ScanState::Fetching);
                }
                fetcher.fetch(target, cancel)
            })
            .await;

        let raw = match outcome.result {
            Ok(raw) => raw,
            Err(source) => {
                lifecycle.advance(ScanState::Failed);
                return Err(ScanError::FetchFailed {
                    url: input.to_string(),
                    attempts: outcome.attempts,
                    source,
                });
            }
        };
        lifecycle.advance(ScanState::Fetched);

        lifecycle.advance(ScanState::Extracting);
        let mut fields = parse(&raw, &self.config.header_checklist);

        let probe_base = Url::parse(&raw.final_url).unwrap_or_else(|_| url.clone());
        permit.record_request();
        let probe = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            probe = probe_security_txt(&self.client, &probe_base) => Some(probe),
        };
        drop(permit);
        let security_txt = match probe {
            Some(Ok(found)) => found,
            Some(Err(e)) => {
                warn!("security.txt probe for {input} failed: {e}");
                fields.warnings.push(ExtractionWarning::SecurityTxtProbeFailed);
                SecurityTxt::default()
            }
            None => {
                lifecycle.advance(ScanState::Failed);
                return Err(ScanError::FetchFailed {
                    url: input.to_string(),
                    attempts: outcome.attempts,
                    source: FetchError::Cancelled,
                });
            }
        };

        let report = SecurityReport {
            url: input.to_string(),
            final_url: raw.final_url,
            status_code: raw.status_code,
            timestamp: Utc::now(),
            mode: self.fetcher.mode(),
            attempts: outcome.attempts,
            title: fields.title,
            description: fields.description,
            security_headers: fields.security_headers,
            missing_important_headers: fields.missing_important_headers,
            ssl: fields.ssl,
            server: fields.server,
            powered_by: fields.powered_by,
            generator: fields.generator,
            technologies: fields.technologies,
            security_txt,
            internal_links: fields.internal_links,
            external_links: fields.external_links,
            contact_emails: fields.contact_emails,
            warnings: fields.warnings,
        };
        lifecycle.advance(ScanState::Extracted);
        info!(
            "Scanned {input}: status {}, {} missing header(s), {} technolog(ies), {} attempt(s)",
            report.status_code,
            report.missing_important_headers.len(),
            report.technologies.len(),
            report.attempts
        );
        Ok(report)
    }
}

/// Tracks and logs state transitions of one scan.
struct Lifecycle<'a> {
    url: &'a str,
    state: ScanState,
}

impl<'a> Lifecycle<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            state: ScanState::Idle,
        }
    }

    fn advance(&mut self, next: ScanState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal scan transition {} -> {next}",
            self.state
        );
        debug!("{}: {} -> {next}", self.url, self.state);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
