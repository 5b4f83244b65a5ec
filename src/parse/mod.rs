//! Extraction of report fields from a fetched page.
//!
//! [`parse`] is pure: the same [`RawPage`] and checklist always produce the
//! same [`PageFields`]. Each field is extracted independently; a field that
//! cannot be extracted is left absent and a warning is recorded, the rest of
//! the page is still processed.
//!
//! The security.txt probe is the only network-touching step and lives apart
//! from `parse` in [`probe_security_txt`].

mod emails;
mod headers;
mod html;
mod links;
mod security_txt;

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use scraper::Html;
use url::Url;

use crate::config::{HEADER_SERVER, HEADER_X_POWERED_BY};
use crate::error_handling::ExtractionWarning;
use crate::fetch::RawPage;
use crate::fingerprint::{detect_technologies, PageEvidence};
use crate::models::SslReport;

pub use emails::extract_emails;
pub use headers::{capture_security_headers, header_text, HeaderFindings};
pub use html::{extract_generator, extract_meta_description, extract_title};
pub use links::{extract_links, resolve_link, LinkSets};
pub use security_txt::{probe_security_txt, SECURITY_TXT_PATHS};

/// Report fields derived from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub generator: Option<String>,
    pub security_headers: BTreeMap<String, String>,
    pub missing_important_headers: Vec<String>,
    pub ssl: Option<SslReport>,
    pub server: Option<String>,
    pub powered_by: Option<String>,
    pub technologies: BTreeSet<String>,
    pub internal_links: BTreeSet<String>,
    pub external_links: BTreeSet<String>,
    pub contact_emails: BTreeSet<String>,
    pub warnings: Vec<ExtractionWarning>,
}

/// Extracts every report field from `raw`.
pub fn parse(raw: &RawPage, checklist: &[String]) -> PageFields {
    let document = Html::parse_document(&raw.body);
    let mut warnings = Vec::new();

    let header_findings = capture_security_headers(&raw.headers, checklist);

    let title = extract_title(&document);
    if title.is_none() {
        debug!("No title on {}", raw.final_url);
        warnings.push(ExtractionWarning::MissingTitle);
    }
    let description = extract_meta_description(&document);
    if description.is_none() {
        warnings.push(ExtractionWarning::MissingDescription);
    }
    let generator = extract_generator(&document);

    let (ssl, final_url) = match Url::parse(&raw.final_url) {
        Ok(final_url) => (ssl_report(raw, &final_url, &mut warnings), Some(final_url)),
        Err(e) => {
            warn!("Final URL '{}' is not parseable: {e}", raw.final_url);
            warnings.push(ExtractionWarning::InvalidFinalUrl);
            // scheme check on the raw string keeps the https-iff-ssl invariant
            let ssl = raw
                .final_url
                .get(..8)
                .is_some_and(|p| p.eq_ignore_ascii_case("https://"))
                .then(|| SslReport {
                    verified: raw.ssl_info.as_ref().is_some_and(|s| s.verified),
                    issuer: None,
                    protocol: None,
                });
            (ssl, None)
        }
    };

    let links = final_url
        .as_ref()
        .map(|base| extract_links(&document, base))
        .unwrap_or_default();

    let technologies = detect_technologies(&PageEvidence {
        headers: &raw.headers,
        document: &document,
        body: &raw.body,
        generator: generator.as_deref(),
        script_globals: &raw.script_globals,
    });

    PageFields {
        title,
        description,
        generator,
        security_headers: header_findings.present,
        missing_important_headers: header_findings.missing,
        ssl,
        server: header_text(&raw.headers, HEADER_SERVER),
        powered_by: header_text(&raw.headers, HEADER_X_POWERED_BY),
        technologies,
        internal_links: links.internal,
        external_links: links.external,
        contact_emails: extract_emails(&document),
        warnings,
    }
}

/// SSL details, present exactly when the final URL is https.
fn ssl_report(
    raw: &RawPage,
    final_url: &Url,
    warnings: &mut Vec<ExtractionWarning>,
) -> Option<SslReport> {
    if final_url.scheme() != "https" {
        return None;
    }
    let report = match &raw.ssl_info {
        Some(info) => SslReport {
            verified: info.verified,
            issuer: info.issuer.clone(),
            protocol: info.protocol.clone(),
        },
        None => SslReport {
            verified: false,
            issuer: None,
            protocol: None,
        },
    };
    if report.issuer.is_none() || report.protocol.is_none() {
        debug!("Incomplete TLS details for {final_url}");
        warnings.push(ExtractionWarning::PeerCertificateUnavailable);
    }
    Some(report)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
