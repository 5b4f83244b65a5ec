//! Configuration types.
//!
//! This module defines the scan configuration bundle consumed by the core and
//! the enums used to select behaviour explicitly (fetch mode, robots failure
//! mode, logging).

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_CONTACT_EMAIL, DEFAULT_MAX_DELAY_SECS, DEFAULT_MIN_DELAY_SECS,
    DEFAULT_RENDER_SETTLE_MS, PRODUCT_TOKEN, PRODUCT_VERSION, RETRY_BASE_DELAY_MS,
    RETRY_BUDGET_SECS,
};
use crate::config::headers::DEFAULT_HEADER_CHECKLIST;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which fetch strategy a scan uses.
///
/// Always chosen by configuration; the scanner never switches strategy based
/// on what a page looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP GET, no JavaScript execution
    Static,
    /// Headless browser navigation with scripts executed
    Dynamic,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Static => "static",
            FetchMode::Dynamic => "dynamic",
        }
    }
}

/// What the policy gate does when robots.txt cannot be retrieved at all
/// (network failure or 5xx, as opposed to a 404).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsFailureMode {
    /// Fail open: treat the site as having no robots rules
    Allow,
    /// Fail closed: deny the scan
    Deny,
}

/// Scan configuration bundle (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use site_posture::{FetchMode, ScanConfig};
///
/// let config = ScanConfig {
///     mode: FetchMode::Dynamic,
///     contact_email: "secops@example.org".to_string(),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Fetch strategy
    pub mode: FetchMode,

    /// Consult robots.txt before fetching
    pub respect_robots: bool,

    /// Contact address embedded in the identifying request headers
    pub contact_email: String,

    /// Per-request timeout in seconds (whole render for dynamic mode)
    pub timeout_seconds: f64,

    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Lower bound of the per-domain inter-request spacing, in seconds
    pub min_delay: f64,

    /// Upper bound of the per-domain inter-request spacing, in seconds
    pub max_delay: f64,

    /// Base delay for exponential backoff, in milliseconds
    pub retry_base_delay_ms: u64,

    /// Total wall-clock budget for one fetch including retries, in seconds
    pub retry_budget_seconds: u64,

    /// Outcome when robots.txt is unreachable
    pub robots_unreachable: RobotsFailureMode,

    /// Headers whose absence is reported, in report order
    pub header_checklist: Vec<String>,

    /// Extra wait after navigation before the rendered DOM is captured
    pub render_settle_ms: u64,

    /// Run the browser without a window (dynamic mode)
    pub headless: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: FetchMode::Static,
            respect_robots: true,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            timeout_seconds: 15.0,
            max_retries: 3,
            min_delay: DEFAULT_MIN_DELAY_SECS,
            max_delay: DEFAULT_MAX_DELAY_SECS,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            retry_budget_seconds: RETRY_BUDGET_SECS,
            robots_unreachable: RobotsFailureMode::Allow,
            header_checklist: DEFAULT_HEADER_CHECKLIST
                .iter()
                .map(|h| h.to_string())
                .collect(),
            render_settle_ms: DEFAULT_RENDER_SETTLE_MS,
            headless: true,
        }
    }
}

impl ScanConfig {
    /// Checks every option for values the scanner cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !looks_like_email(&self.contact_email) {
            return Err(ConfigError::InvalidContactEmail(self.contact_email.clone()));
        }
        if self.timeout_seconds <= 0.0 || Duration::try_from_secs_f64(self.timeout_seconds).is_err()
        {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }
        for delay in [self.min_delay, self.max_delay] {
            // rejects NaN, negatives, infinities and values too large for a Duration
            if Duration::try_from_secs_f64(delay).is_err() {
                return Err(ConfigError::InvalidDelay(delay));
            }
        }
        if self.min_delay > self.max_delay {
            return Err(ConfigError::DelayRange {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        if self.header_checklist.is_empty()
            || self.header_checklist.iter().any(|h| h.trim().is_empty())
        {
            return Err(ConfigError::EmptyChecklist);
        }
        Ok(())
    }

    /// Per-request timeout as a `Duration`.
    ///
    /// Out-of-range values (rejected by [`validate`](Self::validate)) map to
    /// `Duration::MAX`.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::MAX)
    }

    /// Identifying User-Agent carrying the contact address.
    pub fn user_agent(&self) -> String {
        format!(
            "{PRODUCT_TOKEN}/{PRODUCT_VERSION} (+security posture scan; {})",
            self.contact_email
        )
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
