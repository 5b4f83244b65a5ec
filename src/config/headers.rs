//! HTTP header name constants.
//!
//! Security headers inspected on every scanned page, and the identification
//! headers used for technology fingerprinting.

// Security header names
/// Content Security Policy header
pub const HEADER_CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";
/// HTTP Strict Transport Security header
pub const HEADER_STRICT_TRANSPORT_SECURITY: &str = "Strict-Transport-Security";
/// X-Content-Type-Options header
pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";
/// X-Frame-Options header
pub const HEADER_X_FRAME_OPTIONS: &str = "X-Frame-Options";
/// X-XSS-Protection header
pub const HEADER_X_XSS_PROTECTION: &str = "X-XSS-Protection";
/// Referrer-Policy header
pub const HEADER_REFERRER_POLICY: &str = "Referrer-Policy";
/// Permissions-Policy header
pub const HEADER_PERMISSIONS_POLICY: &str = "Permissions-Policy";
/// Cross-Origin-Embedder-Policy header
pub const HEADER_CROSS_ORIGIN_EMBEDDER_POLICY: &str = "Cross-Origin-Embedder-Policy";
/// Cross-Origin-Opener-Policy header
pub const HEADER_CROSS_ORIGIN_OPENER_POLICY: &str = "Cross-Origin-Opener-Policy";
/// Cross-Origin-Resource-Policy header
pub const HEADER_CROSS_ORIGIN_RESOURCE_POLICY: &str = "Cross-Origin-Resource-Policy";

/// Security headers captured into the report whenever present.
///
/// The configured checklist is merged with this list, so a checklist entry
/// that is not listed here is still captured.
pub const SECURITY_HEADERS: &[&str] = &[
    HEADER_CONTENT_SECURITY_POLICY,
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_FRAME_OPTIONS,
    HEADER_X_CONTENT_TYPE_OPTIONS,
    HEADER_X_XSS_PROTECTION,
    HEADER_REFERRER_POLICY,
    HEADER_PERMISSIONS_POLICY,
    HEADER_CROSS_ORIGIN_EMBEDDER_POLICY,
    HEADER_CROSS_ORIGIN_OPENER_POLICY,
    HEADER_CROSS_ORIGIN_RESOURCE_POLICY,
];

/// Default checklist of headers whose absence is reported.
pub const DEFAULT_HEADER_CHECKLIST: &[&str] = &[
    HEADER_CONTENT_SECURITY_POLICY,
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_FRAME_OPTIONS,
    HEADER_X_CONTENT_TYPE_OPTIONS,
];

/// Headers whose absence is flagged as critical in the rendered report.
pub const CRITICAL_HEADERS: &[&str] = &[
    HEADER_CONTENT_SECURITY_POLICY,
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_FRAME_OPTIONS,
];

// Infrastructure/Server identification
/// Server header (identifies server software)
pub const HEADER_SERVER: &str = "Server";
/// X-Powered-By header (identifies server framework)
pub const HEADER_X_POWERED_BY: &str = "X-Powered-By";
/// X-Generator header (identifies CMS/generator)
pub const HEADER_X_GENERATOR: &str = "X-Generator";
/// Retry-After header (rate limiting hint)
pub const HEADER_RETRY_AFTER: &str = "Retry-After";
