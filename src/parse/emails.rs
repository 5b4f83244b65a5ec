//! Contact email extraction.
//!
//! Addresses are taken from visible text and `mailto:` links with one
//! conservative pattern. Obfuscated forms ("name [at] example dot com") are not
//! decoded.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use log::error;
use regex::Regex;
use scraper::{Html, Node, Selector};

use crate::config::MAX_TEXT_SCAN_CHARS;
use crate::utils::parse_selector_with_fallback;

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Elements whose text never renders.
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(EMAIL_PATTERN));

static EXACT_EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(&format!("^{EMAIL_PATTERN}$")));

static MAILTO_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("a[href^='mailto:' i]", "mailto extraction"));

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            error!("Failed to compile email pattern '{pattern}': {e}");
            None
        }
    }
}

/// Lowercased, deduplicated addresses from visible text and mailto links.
pub fn extract_emails(document: &Html) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();

    if let Some(re) = EMAIL_RE.as_ref() {
        let text = visible_text(document, MAX_TEXT_SCAN_CHARS);
        emails.extend(re.find_iter(&text).map(|m| m.as_str().to_ascii_lowercase()));
    }

    if let (Some(selector), Some(exact)) = (MAILTO_SELECTOR.as_ref(), EXACT_EMAIL_RE.as_ref()) {
        for href in document
            .select(selector)
            .filter_map(|el| el.value().attr("href"))
        {
            emails.extend(
                mailto_recipients(href)
                    .filter(|addr| exact.is_match(addr))
                    .map(|addr| addr.to_ascii_lowercase()),
            );
        }
    }
    emails
}

/// Recipients of a `mailto:` href, query stripped.
fn mailto_recipients(href: &str) -> impl Iterator<Item = &str> {
    let rest = href.get("mailto:".len()..).unwrap_or_default();
    let recipients = rest.split('?').next().unwrap_or_default();
    recipients
        .split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
}

/// Concatenated text nodes outside hidden elements, up to `max_chars` bytes.
///
/// Text nodes are separated by a space so adjacent elements do not fuse into
/// one token.
fn visible_text(document: &Html, max_chars: usize) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        text.push_str(fragment);
        text.push(' ');
        if text.len() >= max_chars {
            let mut cut = max_chars;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
            break;
        }
    }
    text
}
