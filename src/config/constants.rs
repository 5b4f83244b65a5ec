//! Configuration constants.
//!
//! This module defines the operational constants used throughout the scanner,
//! including timeouts, size limits, retry bounds and the identifying product token.

use std::time::Duration;

/// Product token sent in the User-Agent and matched against robots.txt groups.
pub const PRODUCT_TOKEN: &str = "SitePosture";

/// Product version reported in the User-Agent.
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default contact address embedded in outgoing requests.
///
/// Operators are expected to override this with their own address so site owners
/// can reach whoever is running the scan.
pub const DEFAULT_CONTACT_EMAIL: &str = "security-research@example.com";

// Network operation timeouts
/// TCP connection timeout for the TLS probe in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout for the TLS probe in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Timeout for the robots.txt and security.txt requests in seconds
pub const AUXILIARY_REQUEST_TIMEOUT_SECS: u64 = 5;

// Redirect handling
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

// Response and body size limits
/// Maximum response body size in bytes (5MB)
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;
/// Maximum robots.txt size in bytes (500KB, the limit major crawlers apply)
pub const MAX_ROBOTS_TXT_SIZE: usize = 500 * 1024;
/// Maximum visible text scanned for email addresses, in characters
pub const MAX_TEXT_SCAN_CHARS: usize = 200_000;

// Retry strategy
/// Default base delay for exponential backoff in milliseconds
pub const RETRY_BASE_DELAY_MS: u64 = 2000;
/// Maximum single backoff delay in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 60;
/// Jitter added on top of each backoff delay, as a fraction of that delay
pub const RETRY_JITTER_FRACTION: f64 = 0.1;
/// Default total wall-clock budget for one fetch including all retries
pub const RETRY_BUDGET_SECS: u64 = 120;

// Politeness
/// Default lower bound of the inter-request spacing in seconds
pub const DEFAULT_MIN_DELAY_SECS: f64 = 2.5;
/// Default upper bound of the inter-request spacing in seconds
pub const DEFAULT_MAX_DELAY_SECS: f64 = 7.0;
/// Highest backoff level tracked per domain (spacing is multiplied by 2^level)
pub const MAX_BACKOFF_LEVEL: u32 = 5;
/// Upper bound on any single spacing wait in seconds
pub const MAX_SPACING_SECS: f64 = 60.0;

// Dynamic rendering
/// Default settle time after navigation before the DOM is captured
pub const DEFAULT_RENDER_SETTLE_MS: u64 = 1500;
/// Browser viewport used for dynamic rendering
pub const BROWSER_WINDOW_SIZE: (u32, u32) = (1280, 800);

// HTTP status codes
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
