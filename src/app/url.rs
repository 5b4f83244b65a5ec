//! URL validation and normalization utilities.

use log::debug;
use url::Url;

use crate::error_handling::ConfigError;

/// Maximum URL length (2048 characters), matching common browser and server limits.
const MAX_URL_LENGTH: usize = 2048;

/// Adds an `https://` prefix to input that carries no scheme.
///
/// Input that already names a scheme is returned unchanged, so `ftp://host`
/// is later rejected as unsupported rather than mangled into an https URL.
pub fn normalize_url_input(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Validates that `input` is an absolute http(s) URL with a host.
///
/// # Errors
///
/// - `ConfigError::UrlTooLong` above 2048 characters
/// - `ConfigError::InvalidUrl` when the URL does not parse or has no host
/// - `ConfigError::UnsupportedScheme` for anything but http and https
pub fn parse_scan_url(input: &str) -> Result<Url, ConfigError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(ConfigError::UrlTooLong(MAX_URL_LENGTH));
    }
    let url = Url::parse(input).map_err(|e| {
        debug!("Rejecting URL '{input}': {e}");
        ConfigError::InvalidUrl(input.to_string())
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(input.to_string()));
    }
    Ok(url)
}
