//! Page metadata: title, meta description and generator.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::utils::parse_selector_with_fallback;

static TITLE_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("title", "title extraction"));

static META_DESCRIPTION_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| {
    parse_selector_with_fallback("meta[name='description' i]", "meta description extraction")
});

static META_GENERATOR_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| {
    parse_selector_with_fallback("meta[name='generator' i]", "meta generator extraction")
});

/// Text of the first `<title>` element, whitespace-collapsed.
///
/// Returns `None` when there is no title or it is blank.
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = TITLE_SELECTOR.as_ref()?;
    let element = document.select(selector).next()?;
    non_blank(&element.text().collect::<String>())
}

/// `content` of `<meta name="description">`.
pub fn extract_meta_description(document: &Html) -> Option<String> {
    meta_content(document, META_DESCRIPTION_SELECTOR.as_ref()?)
}

/// `content` of `<meta name="generator">`.
pub fn extract_generator(document: &Html) -> Option<String> {
    meta_content(document, META_GENERATOR_SELECTOR.as_ref()?)
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .find_map(non_blank)
}

fn non_blank(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
