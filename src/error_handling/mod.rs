//! Error handling.
//!
//! This module provides:
//! - The scan failure taxonomy (`ScanError`, `FetchError`, `ConfigError`)
//! - Stable failure category names (`ErrorKind`)
//! - Per-field extraction warnings that degrade a report without failing it
//! - Categorization of `reqwest` errors and HTTP statuses
//!
//! Failures are split into:
//! - **Transient**: timeouts, connection failures, 5xx, 429 (retried)
//! - **Permanent**: other 4xx, TLS failures, redirect loops, browser failures (surfaced)
//! - **Terminal before fetch**: invalid configuration and policy denials

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, fetch_error_for_status, parse_retry_after};
pub use types::{
    ConfigError, ErrorKind, ExportError, ExtractionWarning, FetchError, InitializationError,
    ScanError, ScanFailure,
};
