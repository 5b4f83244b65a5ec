//! Anchor link resolution and internal/external partitioning.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::domain::same_site;
use crate::utils::parse_selector_with_fallback;

static ANCHOR_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("a[href]", "link extraction"));

/// Resolved links split by site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSets {
    pub internal: BTreeSet<String>,
    pub external: BTreeSet<String>,
}

/// Resolves every anchor against `base` and partitions the results.
///
/// A link is internal when it shares `base`'s registrable domain (or full
/// host, for IPs and single-label hosts). Fragment-only hrefs, non-http(s)
/// schemes and unresolvable hrefs are skipped; fragments are stripped.
pub fn extract_links(document: &Html, base: &Url) -> LinkSets {
    let mut links = LinkSets::default();
    let Some(selector) = ANCHOR_SELECTOR.as_ref() else {
        return links;
    };

    for href in document
        .select(selector)
        .filter_map(|el| el.value().attr("href"))
    {
        let Some(resolved) = resolve_link(base, href) else {
            continue;
        };
        if same_site(&resolved, base) {
            links.internal.insert(resolved.into());
        } else {
            links.external.insert(resolved.into());
        }
    }
    links
}

/// Resolves one href against `base`.
///
/// Returns `None` for fragment-only, empty, non-http(s) or malformed hrefs.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") || resolved.host().is_none() {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}
