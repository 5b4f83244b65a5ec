//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses a CSS selector, logging instead of panicking on failure.
///
/// Selectors in this crate are constants, so a failure is a programming error;
/// it still must not take a scan down, so callers treat `None` as "matches
/// nothing" and record the affected field as absent.
///
/// # Arguments
///
/// * `selector_str` - The CSS selector string to parse
/// * `context` - Context description for error logging (e.g., "title extraction")
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::error!("Failed to parse CSS selector '{selector_str}' in {context}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selector() {
        assert!(parse_selector_with_fallback("meta[name='description']", "test").is_some());
    }

    #[test]
    fn test_invalid_selector_is_none() {
        assert!(parse_selector_with_fallback("a[href", "test").is_none());
        assert!(parse_selector_with_fallback(":::", "test").is_none());
    }
}
