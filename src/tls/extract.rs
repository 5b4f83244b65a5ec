//! Certificate and protocol-name helpers.

use x509_parser::prelude::*;

/// Reads a display name for the issuer of a DER-encoded certificate.
///
/// Prefers the issuer's organization ("Let's Encrypt"), then its common name,
/// then the full distinguished name.
///
/// # Returns
///
/// `None` if the certificate cannot be parsed.
pub fn issuer_from_der(der: &[u8]) -> Option<String> {
    let (_, cert) = parse_x509_certificate(der).ok()?;
    let issuer = cert.issuer();

    first_value(issuer.iter_organization())
        .or_else(|| first_value(issuer.iter_common_name()))
        .or_else(|| {
            let full = issuer.to_string();
            (!full.is_empty()).then_some(full)
        })
}

fn first_value<'a, 'b>(
    mut attrs: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>,
) -> Option<String>
where
    'b: 'a,
{
    attrs
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Normalizes TLS protocol names from different sources to one spelling.
///
/// rustls reports `TLSv1_3`, browsers report `TLS 1.3`; both become `TLSv1.3`.
/// Unrecognized names (e.g. `QUIC`) are returned unchanged.
pub fn normalize_protocol(raw: &str) -> String {
    let trimmed = raw.trim();
    let upper = trimmed.to_ascii_uppercase();
    let Some(rest) = upper.strip_prefix("TLS") else {
        return trimmed.to_string();
    };
    let version = rest
        .trim_start_matches(['V', ' '])
        .replace('_', ".");
    let valid = !version.is_empty()
        && version.chars().all(|c| c.is_ascii_digit() || c == '.')
        && version.chars().next().is_some_and(|c| c.is_ascii_digit());
    if valid {
        format!("TLSv{version}")
    } else {
        trimmed.to_string()
    }
}
