//! Security header capture.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;

use crate::config::SECURITY_HEADERS;

/// Security headers found on a response and checklist entries that were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFindings {
    /// Canonical header name -> value as sent (repeated headers joined by ", ")
    pub present: BTreeMap<String, String>,
    /// Missing checklist entries, in checklist order
    pub missing: Vec<String>,
}

/// Matches response headers case-insensitively against `checklist` and the
/// well-known security headers.
///
/// Keys use the checklist's spelling when a header is named there, otherwise
/// the spelling from [`SECURITY_HEADERS`]. A checklist entry that is not a valid
/// header name can never be present, so it is reported missing.
pub fn capture_security_headers(headers: &HeaderMap, checklist: &[String]) -> HeaderFindings {
    let mut findings = HeaderFindings::default();
    let mut seen: Vec<String> = Vec::new();

    let wanted = checklist
        .iter()
        .map(|h| (h.trim(), true))
        .chain(SECURITY_HEADERS.iter().map(|h| (*h, false)));

    for (name, in_checklist) in wanted {
        let lowered = name.to_ascii_lowercase();
        if seen.contains(&lowered) {
            continue;
        }
        seen.push(lowered);

        match header_value(headers, name) {
            Some(value) => {
                findings.present.insert(name.to_string(), value);
            }
            None if in_checklist => findings.missing.push(name.to_string()),
            None => {}
        }
    }
    findings
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// First value of a header as text, trimmed; empty values count as absent.
pub fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .filter(|v| !v.is_empty())
}
