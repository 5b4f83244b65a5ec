//! String sanitization for file names and terminal output.

/// Turns a URL into a string safe to embed in a file name.
///
/// The scheme is dropped, every run of characters outside `[A-Za-z0-9.-]`
/// becomes one underscore, and the result is cut to `max_len` characters.
pub fn sanitize_for_filename(url: &str, max_len: usize) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let mut out = String::with_capacity(without_scheme.len());
    let mut last_was_sep = false;
    for c in without_scheme.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    let trimmed = out.trim_matches('_');
    let result: String = trimmed.chars().take(max_len).collect();
    if result.is_empty() {
        "site".to_string()
    } else {
        result
    }
}

/// Shortens `value` to `max_chars` characters, marking the cut with "...".
pub fn truncate_for_display(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let kept: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Removes control characters (except tab and newline) from text shown in a terminal.
pub fn strip_control_chars(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
        .collect()
}
