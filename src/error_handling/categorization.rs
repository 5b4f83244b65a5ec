//! Error categorization.
//!
//! Maps `reqwest` failures and HTTP statuses onto the [`FetchError`] taxonomy so
//! the retry controller can tell transient failures from permanent ones.

use std::error::Error as StdError;
use std::time::Duration;

use super::types::FetchError;

/// Categorizes a `reqwest::Error` into a `FetchError`.
///
/// TLS failures are found by walking the error chain for a `rustls::Error`
/// (reqwest wraps it inside hyper and `std::io::Error` layers), with a message
/// fallback for wrappers that hide the concrete type.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
/// * `timeout` - The timeout that was in force, reported on `Timeout`
pub fn categorize_reqwest_error(error: &reqwest::Error, timeout: Duration) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::Http {
            status: status.as_u16(),
            retry_after: None,
        };
    }

    if error.is_redirect() {
        return FetchError::TooManyRedirects(crate::config::MAX_REDIRECT_HOPS);
    }

    if let Some(message) = tls_failure(error) {
        return FetchError::Ssl(message);
    }

    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        // connect, request, body and decode failures all mean the exchange broke
        // off mid-way; another attempt may succeed
        FetchError::Connection(root_cause_message(error))
    }
}

/// Maps a non-success final status to a `FetchError`.
///
/// # Returns
///
/// `None` for 2xx statuses.
pub fn fetch_error_for_status(
    status: u16,
    headers: &reqwest::header::HeaderMap,
) -> Option<FetchError> {
    if (200..300).contains(&status) {
        return None;
    }
    if (300..400).contains(&status) {
        // redirects are followed by the client; a 3xx here means the chain was cut off
        return Some(FetchError::TooManyRedirects(
            crate::config::MAX_REDIRECT_HOPS,
        ));
    }
    Some(FetchError::Http {
        status,
        retry_after: parse_retry_after(headers),
    })
}

/// Parses a `Retry-After` header expressed in delta-seconds.
///
/// HTTP-date values are ignored; the backoff schedule applies instead.
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(crate::config::HEADER_RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn tls_failure(error: &reqwest::Error) -> Option<String> {
    let mut cause: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(current) = cause {
        if let Some(tls) = current.downcast_ref::<rustls::Error>() {
            return Some(tls.to_string());
        }
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            // io::Error::source() skips the wrapped error, so look at it directly
            if let Some(tls) = io
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<rustls::Error>())
            {
                return Some(tls.to_string());
            }
        }
        let msg = current.to_string().to_lowercase();
        if msg.contains("certificate")
            || msg.contains("invalid peer")
            || msg.contains("unknownissuer")
            || msg.contains("received corrupt message")
        {
            return Some(current.to_string());
        }
        cause = current.source();
    }
    None
}

fn root_cause_message(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut cause = error.source();
    while let Some(current) = cause {
        message = current.to_string();
        cause = current.source();
    }
    message
}
