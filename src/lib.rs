//! site_posture library: single-site security posture scanning
//!
//! This library fetches one page (plain HTTP or a headless browser render) under
//! robots.txt and per-domain rate-limit rules, and reports its security headers,
//! TLS details, technology fingerprint, security.txt presence, links and contact
//! addresses.
//!
//! # Example
//!
//! ```no_run
//! use site_posture::{ScanConfig, Scanner};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig {
//!     contact_email: "secops@example.org".to_string(),
//!     ..Default::default()
//! };
//! let scanner = Scanner::new(config)?;
//!
//! let report = scanner.scan("https://example.com").await?;
//! println!("{} -> {}", report.url, report.status_code);
//! for header in &report.missing_important_headers {
//!     println!("missing {header}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Dynamic mode additionally needs a
//! local Chromium or Chrome installation.

pub mod app;
pub mod config;
mod domain;
mod error_handling;
pub mod export;
mod fetch;
mod fingerprint;
pub mod initialization;
mod models;
mod parse;
mod policy;
mod scan;
mod tls;
mod utils;

pub use config::{FetchMode, LogFormat, LogLevel, RobotsFailureMode, ScanConfig};
pub use domain::{domain_key, registrable_domain, same_site};
pub use error_handling::{
    ConfigError, ErrorKind, ExportError, ExtractionWarning, FetchError, InitializationError,
    ScanError, ScanFailure,
};
pub use fetch::{
    live_browser_sessions, BrowserFetcher, FetchEngine, PageFetcher, RawPage, SslInfo,
    StaticFetcher,
};
pub use fingerprint::{detect_technologies, PageEvidence};
pub use models::{SecurityReport, SecurityTxt, SslReport};
pub use parse::{parse, probe_security_txt, PageFields};
pub use policy::{
    Decision, DenyReason, DomainPermit, DomainRegistry, PolicyGate, RateLimiter,
    RateLimiterState, RobotsPolicy,
};
pub use scan::{ScanState, Scanner};
pub use tls::{probe_tls, TlsProbe, TlsProbeError};
pub use utils::{RetryController, RetryOutcome};
