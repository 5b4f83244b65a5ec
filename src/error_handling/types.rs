//! Error type definitions.
//!
//! This module defines the failure taxonomy of a scan: configuration errors,
//! fetch errors (with their transient subset), policy denials, and the per-field
//! extraction warnings that degrade a report without failing it.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::policy::DenyReason;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configuration cannot be turned into a working scanner.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Invalid input or configuration. Always terminal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("unsupported URL scheme '{0}' (only http and https are scanned)")]
    UnsupportedScheme(String),

    #[error("URL exceeds maximum length ({0} characters)")]
    UrlTooLong(usize),

    #[error("invalid contact email '{0}'")]
    InvalidContactEmail(String),

    #[error("timeout must be a positive number of seconds within duration range, got {0}")]
    InvalidTimeout(f64),

    #[error("delay must be a non-negative number of seconds within duration range, got {0}")]
    InvalidDelay(f64),

    #[error("min_delay ({min}) is greater than max_delay ({max})")]
    DelayRange { min: f64, max: f64 },

    #[error("security header checklist must contain at least one non-empty header name")]
    EmptyChecklist,
}

/// Failure of a single fetch attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request timed out after {0:.1?}")]
    Timeout(Duration),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("TLS certificate validation failed: {0}")]
    Ssl(String),

    #[error("HTTP error status {status}")]
    Http {
        status: u16,
        /// Server-supplied `Retry-After`, when present and expressed in seconds
        retry_after: Option<Duration>,
    },

    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether another attempt may succeed.
    ///
    /// Timeouts, connection failures, 5xx and 429 are transient. Everything
    /// else (other 4xx, TLS failures, redirect loops, browser failures,
    /// cancellation) is permanent for the lifetime of the scan.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Connection(_) => true,
            FetchError::Http { status, .. } => {
                *status == crate::config::HTTP_STATUS_TOO_MANY_REQUESTS
                    || (500..600).contains(status)
            }
            FetchError::Ssl(_)
            | FetchError::TooManyRedirects(_)
            | FetchError::Browser(_)
            | FetchError::Cancelled => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Timeout(_) => ErrorKind::Timeout,
            FetchError::Connection(_) => ErrorKind::ConnectionError,
            FetchError::Ssl(_) => ErrorKind::SslError,
            FetchError::Http { .. } => ErrorKind::HttpError,
            FetchError::TooManyRedirects(_) => ErrorKind::TooManyRedirects,
            FetchError::Browser(_) => ErrorKind::BrowserError,
            FetchError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Server-requested minimum wait before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            FetchError::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Terminal failure of a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{url}: scan denied: {reason}")]
    PolicyDenied { url: String, reason: DenyReason },

    #[error("{url}: fetch failed after {attempts} attempt(s): {source}")]
    FetchFailed {
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("{url}: {source}")]
    Config {
        url: String,
        #[source]
        source: ConfigError,
    },
}

impl ScanError {
    pub fn url(&self) -> &str {
        match self {
            ScanError::PolicyDenied { url, .. }
            | ScanError::FetchFailed { url, .. }
            | ScanError::Config { url, .. } => url,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::PolicyDenied { .. } => ErrorKind::PolicyDenied,
            ScanError::FetchFailed { source, .. } => source.kind(),
            ScanError::Config { .. } => ErrorKind::ConfigError,
        }
    }

    /// Number of fetch attempts made before the scan stopped.
    pub fn attempts(&self) -> u32 {
        match self {
            ScanError::FetchFailed { attempts, .. } => *attempts,
            ScanError::PolicyDenied { .. } | ScanError::Config { .. } => 0,
        }
    }

    /// Serializable summary for JSON output.
    pub fn to_failure(&self) -> ScanFailure {
        ScanFailure {
            url: self.url().to_string(),
            kind: self.kind(),
            message: self.to_string(),
            attempts: self.attempts(),
        }
    }
}

/// Flattened view of a [`ScanError`].
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub url: String,
    pub kind: ErrorKind,
    pub message: String,
    pub attempts: u32,
}

/// Stable names for every failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PolicyDenied,
    Timeout,
    ConnectionError,
    SslError,
    HttpError,
    TooManyRedirects,
    BrowserError,
    Cancelled,
    ConfigError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PolicyDenied => "Policy denied",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::ConnectionError => "Connection error",
            ErrorKind::SslError => "SSL error",
            ErrorKind::HttpError => "HTTP error",
            ErrorKind::TooManyRedirects => "Too many redirects",
            ErrorKind::BrowserError => "Browser error",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::ConfigError => "Configuration error",
        }
    }
}

/// A report field that could not be extracted and was left absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionWarning {
    MissingTitle,
    MissingDescription,
    InvalidFinalUrl,
    PeerCertificateUnavailable,
    SecurityTxtProbeFailed,
}

impl ExtractionWarning {
    /// Returns a human-readable string representation of the warning.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionWarning::MissingTitle => "Missing title",
            ExtractionWarning::MissingDescription => "Missing meta description",
            ExtractionWarning::InvalidFinalUrl => "Final URL could not be parsed; links skipped",
            ExtractionWarning::PeerCertificateUnavailable => {
                "Peer certificate details unavailable"
            }
            ExtractionWarning::SecurityTxtProbeFailed => "security.txt probe failed",
        }
    }
}

/// Errors writing a report to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
