//! Technology fingerprinting.
//!
//! Detection is a pure function of one fetched page. Evidence comes from:
//! - product tokens in `Server`, `X-Powered-By` and `X-Generator`
//! - the `<meta name="generator">` tag
//! - the signature table in [`signatures`]: asset URLs, page markers,
//!   characteristic attributes and class names, identifying headers
//! - JavaScript globals observed by the dynamic fetcher
//!
//! Results are a `BTreeSet`, so the same page always yields the same ordered
//! list of technologies.

mod signatures;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use log::{debug, trace};
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};

use crate::config::{HEADER_SERVER, HEADER_X_GENERATOR, HEADER_X_POWERED_BY};
use crate::utils::parse_selector_with_fallback;

pub use signatures::{known_globals, Signature, SIGNATURES};

/// Parsed selectors per signature, index-aligned with [`SIGNATURES`].
static SIGNATURE_SELECTORS: LazyLock<Vec<Vec<Selector>>> = LazyLock::new(|| {
    SIGNATURES
        .iter()
        .map(|sig| {
            sig.selectors
                .iter()
                .filter_map(|s| parse_selector_with_fallback(s, sig.name))
                .collect()
        })
        .collect()
});

static ASSET_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| {
    parse_selector_with_fallback("script[src], link[href]", "asset URL collection")
});

/// Everything the detector looks at for one page.
#[derive(Debug, Clone, Copy)]
pub struct PageEvidence<'a> {
    pub headers: &'a HeaderMap,
    pub document: &'a Html,
    /// Raw body or rendered DOM
    pub body: &'a str,
    /// Content of the generator meta tag, if any
    pub generator: Option<&'a str>,
    /// Globals reported by the dynamic fetcher
    pub script_globals: &'a [String],
}

/// Detects the technologies evidenced by a page.
pub fn detect_technologies(evidence: &PageEvidence<'_>) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    if let Some(server) = header_str(evidence.headers, HEADER_SERVER) {
        if let Some(name) = product_name(server) {
            found.insert(canonical_name(name));
        }
    }
    if let Some(powered_by) = header_str(evidence.headers, HEADER_X_POWERED_BY) {
        for part in powered_by.split(',') {
            if let Some(name) = product_name(part) {
                found.insert(canonical_name(name));
            }
        }
    }
    for generator in [
        header_str(evidence.headers, HEADER_X_GENERATOR),
        evidence.generator,
    ]
    .into_iter()
    .flatten()
    {
        if let Some(name) = generator_name(generator) {
            found.insert(canonical_name(&name));
        }
    }

    let assets = asset_urls(evidence.document);
    for (index, sig) in SIGNATURES.iter().enumerate() {
        if let Some(source) = signature_match(sig, index, evidence, &assets) {
            trace!("Detected {} via {source}", sig.name);
            found.insert(sig.name.to_string());
        }
    }

    debug!("Detected {} technologies", found.len());
    found
}

/// Names the first kind of evidence that matched `sig`, if any did.
fn signature_match(
    sig: &Signature,
    index: usize,
    evidence: &PageEvidence<'_>,
    assets: &[String],
) -> Option<&'static str> {
    if sig
        .headers
        .iter()
        .any(|h| evidence.headers.contains_key(*h))
    {
        return Some("header");
    }
    if sig
        .asset_urls
        .iter()
        .any(|pattern| assets.iter().any(|url| url.contains(pattern)))
    {
        return Some("asset URL");
    }
    if sig.markers.iter().any(|m| evidence.body.contains(m)) {
        return Some("page marker");
    }
    if let Some(selectors) = SIGNATURE_SELECTORS.get(index) {
        if selectors
            .iter()
            .any(|s| evidence.document.select(s).next().is_some())
        {
            return Some("DOM attribute");
        }
    }
    if sig
        .globals
        .iter()
        .any(|g| evidence.script_globals.iter().any(|seen| seen == g))
    {
        return Some("script global");
    }
    None
}

/// Lowercased `src`/`href` values of every script and link element.
fn asset_urls(document: &Html) -> Vec<String> {
    let Some(selector) = ASSET_SELECTOR.as_ref() else {
        return Vec::new();
    };
    document
        .select(selector)
        .filter_map(|el| el.value().attr("src").or_else(|| el.value().attr("href")))
        .map(str::to_ascii_lowercase)
        .collect()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Product token of a header value: "Apache/2.4.41 (Ubuntu)" -> "Apache".
fn product_name(value: &str) -> Option<&str> {
    value
        .trim()
        .split(|c: char| c == '/' || c == '(' || c.is_whitespace())
        .next()
        .filter(|token| !token.is_empty())
}

/// Generator name without its version: "WordPress 6.4.2" -> "WordPress".
fn generator_name(value: &str) -> Option<String> {
    let words: Vec<&str> = value
        .split_whitespace()
        .take_while(|word| !is_version_token(word) && *word != "-")
        .collect();
    if words.is_empty() {
        return None;
    }
    Some(words.join(" "))
}

fn is_version_token(word: &str) -> bool {
    let digits = word.strip_prefix(['v', 'V']).unwrap_or(word);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

/// Uses the signature table's spelling when a header names a known technology.
fn canonical_name(name: &str) -> String {
    SIGNATURES
        .iter()
        .find(|sig| sig.name.eq_ignore_ascii_case(name))
        .map(|sig| sig.name.to_string())
        .unwrap_or_else(|| name.to_string())
}
