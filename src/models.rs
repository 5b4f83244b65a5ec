//! The scan report and its nested records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{FetchMode, CRITICAL_HEADERS};
use crate::error_handling::ExtractionWarning;

/// TLS details of the connection that served the final page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SslReport {
    /// The certificate chain validated without any override
    pub verified: bool,
    pub issuer: Option<String>,
    pub protocol: Option<String>,
}

/// Result of the security.txt probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecurityTxt {
    pub present: bool,
    /// URL that answered with a 2xx
    pub location: Option<String>,
}

/// Security posture of one scanned page.
///
/// Built exactly once per successful scan and never modified afterwards.
/// Sets and maps are ordered so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    /// URL as requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status_code: u16,
    /// Completion time of the scan
    pub timestamp: DateTime<Utc>,
    pub mode: FetchMode,
    /// Fetch attempts made, including the first
    pub attempts: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Security headers present on the response, keyed by canonical name
    pub security_headers: BTreeMap<String, String>,
    /// Checklist headers absent from the response, in checklist order
    pub missing_important_headers: Vec<String>,
    /// Present iff `final_url` is https
    pub ssl: Option<SslReport>,
    pub server: Option<String>,
    pub powered_by: Option<String>,
    pub generator: Option<String>,
    pub technologies: BTreeSet<String>,
    pub security_txt: SecurityTxt,
    pub internal_links: BTreeSet<String>,
    pub external_links: BTreeSet<String>,
    pub contact_emails: BTreeSet<String>,
    /// Fields that could not be extracted
    pub warnings: Vec<ExtractionWarning>,
}

impl SecurityReport {
    /// Whether any of CSP, HSTS or X-Frame-Options is missing.
    pub fn has_critical_missing_headers(&self) -> bool {
        self.missing_important_headers
            .iter()
            .any(|missing| CRITICAL_HEADERS.iter().any(|c| c.eq_ignore_ascii_case(missing)))
    }

    /// Critical headers that are missing, in checklist order.
    pub fn critical_missing_headers(&self) -> Vec<&str> {
        self.missing_important_headers
            .iter()
            .filter(|missing| CRITICAL_HEADERS.iter().any(|c| c.eq_ignore_ascii_case(missing)))
            .map(String::as_str)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_report;
    use super::*;

    #[test]
    fn test_critical_missing_headers() {
        let report = sample_report();
        assert!(report.has_critical_missing_headers());
        assert_eq!(
            report.critical_missing_headers(),
            vec!["Strict-Transport-Security"]
        );

        let mut only_nosniff = sample_report();
        only_nosniff.missing_important_headers = vec!["X-Content-Type-Options".to_string()];
        assert!(!only_nosniff.has_critical_missing_headers());
    }

    #[test]
    fn test_critical_match_is_case_insensitive() {
        let mut report = sample_report();
        report.missing_important_headers = vec!["content-security-policy".to_string()];
        assert!(report.has_critical_missing_headers());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample_report()).unwrap();
        for field in [
            "url",
            "final_url",
            "status_code",
            "timestamp",
            "mode",
            "attempts",
            "title",
            "description",
            "security_headers",
            "missing_important_headers",
            "ssl",
            "server",
            "technologies",
            "security_txt",
            "internal_links",
            "external_links",
            "contact_emails",
            "warnings",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["mode"], "static");
        assert_eq!(json["ssl"]["protocol"], "TLSv1.3");
        assert_eq!(json["security_txt"]["present"], true);
        assert_eq!(json["timestamp"], "2026-03-01T12:30:45Z");
    }
}
