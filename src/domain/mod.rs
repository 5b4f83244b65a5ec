//! Domain extraction utilities.
//!
//! This module derives the registrable domain of a URL using the Public Suffix
//! List, which is the granularity used for per-domain caches and for classifying
//! links as internal or external.
//!
//! Key functions:
//! - `registrable_domain()` - Registrable domain of a host (e.g. "example.co.uk")
//! - `domain_key()` - Cache key for a URL (registrable domain, or host and port for IPs)
//! - `same_site()` - Link classification (registrable domain, or host for IPs)

use url::{Host, Url};

/// Extracts the registrable domain from a host name.
///
/// # Arguments
///
/// * `host` - A host name such as "www.example.co.uk"
///
/// # Returns
///
/// The registrable domain (e.g. "example.co.uk"), or `None` when the host is an
/// IP literal, a single label such as "localhost", or a bare public suffix.
pub fn registrable_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host.parse::<std::net::IpAddr>().is_ok() || host.starts_with('[') {
        return None;
    }
    if !host.contains('.') {
        return None;
    }
    psl::domain_str(&host).map(str::to_string)
}

/// Returns the key under which per-domain state for `url` is stored.
///
/// Hosts without a registrable domain (IP addresses, "localhost") are keyed by
/// the full host so they still get their own entry. The port is included for
/// those hosts so two local services are kept apart.
///
/// # Returns
///
/// `None` if the URL has no host.
pub fn domain_key(url: &Url) -> Option<String> {
    match site_key(url)? {
        SiteKey::Registrable(domain) => Some(domain),
        SiteKey::Host(host) => Some(match url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host,
        }),
    }
}

/// Whether two URLs belong to the same site for link classification.
///
/// Scheme and port are ignored, so `https://10.0.0.1/` and `http://10.0.0.1/x`
/// are the same site just as `https://example.com/` and `http://example.com/`
/// are.
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (site_key(a), site_key(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SiteKey {
    Registrable(String),
    /// IP literal or single-label host, lowercased
    Host(String),
}

fn site_key(url: &Url) -> Option<SiteKey> {
    let host = match url.host()? {
        Host::Domain(d) => d.to_ascii_lowercase(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => format!("[{ip}]"),
    };
    Some(match registrable_domain(&host) {
        Some(domain) => SiteKey::Registrable(domain),
        None => SiteKey::Host(host),
    })
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
