//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, etc.)
//! - HTTP header name constants and the default security-header checklist
//! - The scan configuration bundle and CLI option types

mod cli;
mod constants;
mod headers;
mod types;

// Re-export all constants
pub use cli::Opt;
pub use constants::*;
pub use headers::*;
pub use types::{FetchMode, LogFormat, LogLevel, RobotsFailureMode, ScanConfig};
