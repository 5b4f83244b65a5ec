use super::*;
use reqwest::header::{HeaderName, HeaderValue};

fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}

fn detect(
    header_pairs: &[(&str, &str)],
    body: &str,
    generator: Option<&str>,
    globals: &[&str],
) -> Vec<String> {
    let headers = headers(header_pairs);
    let document = Html::parse_document(body);
    let globals: Vec<String> = globals.iter().map(|g| g.to_string()).collect();
    detect_technologies(&PageEvidence {
        headers: &headers,
        document: &document,
        body,
        generator,
        script_globals: &globals,
    })
    .into_iter()
    .collect()
}

#[test]
fn test_server_and_powered_by_tokens() {
    let found = detect(
        &[
            ("server", "Apache/2.4.41 (Ubuntu)"),
            ("x-powered-by", "PHP/8.2.1, ASP.NET"),
        ],
        "<html></html>",
        None,
        &[],
    );
    assert_eq!(found, vec!["ASP.NET", "Apache", "PHP"]);
}

#[test]
fn test_generator_meta_strips_version() {
    let found = detect(&[], "<html></html>", Some("WordPress 6.4.2"), &[]);
    assert_eq!(found, vec!["WordPress"]);

    let found = detect(&[("x-generator", "Drupal 10 (https://www.drupal.org)")], "", None, &[]);
    assert_eq!(found, vec!["Drupal"]);
}

#[test]
fn test_script_src_signatures() {
    let body = r#"<html><head>
        <script src="/static/jquery.min.js"></script>
        <script src="https://cdn.example.com/react-dom.production.min.js"></script>
        <link rel="stylesheet" href="/css/Bootstrap.min.css">
    </head></html>"#;
    let found = detect(&[], body, None, &[]);
    assert_eq!(found, vec!["Bootstrap", "React", "jQuery"]);
}

#[test]
fn test_attribute_and_class_signatures() {
    let body = r#"<html><body>
        <app-root ng-version="17.0.1"></app-root>
        <div class="card svelte-1x2y3z"></div>
        <div x-data="{ open: false }"></div>
    </body></html>"#;
    let found = detect(&[], body, None, &[]);
    assert_eq!(found, vec!["Alpine.js", "Angular", "Svelte"]);
}

#[test]
fn test_page_markers() {
    let body = r#"<html><body><script id="__NEXT_DATA__" type="application/json">{}</script>
        <script src="/_next/static/chunks/main.js"></script></body></html>"#;
    assert_eq!(detect(&[], body, None, &[]), vec!["Next.js"]);
}

#[test]
fn test_script_globals_only_from_dynamic_fetch() {
    let found = detect(&[], "<html></html>", None, &["Vue", "gtag", "unknownThing"]);
    assert_eq!(found, vec!["Google Analytics", "Vue.js"]);
}

#[test]
fn test_identifying_headers_and_canonical_spelling() {
    let found = detect(
        &[("server", "cloudflare"), ("cf-ray", "84a1b2c3d4-AMS")],
        "",
        None,
        &[],
    );
    assert_eq!(found, vec!["Cloudflare"]);
}

#[test]
fn test_plain_page_detects_nothing() {
    let found = detect(
        &[("content-type", "text/html")],
        "<html><head><title>Hi</title></head><body><p>plain</p></body></html>",
        None,
        &[],
    );
    assert!(found.is_empty());
}

#[test]
fn test_detection_is_deterministic() {
    let body = r#"<script src="/wp-content/themes/x/jquery.js"></script><div data-reactroot></div>"#;
    let first = detect(&[("server", "nginx/1.25.3")], body, Some("WordPress 6.4"), &[]);
    for _ in 0..5 {
        assert_eq!(
            detect(&[("server", "nginx/1.25.3")], body, Some("WordPress 6.4"), &[]),
            first
        );
    }
    assert_eq!(first, vec!["React", "WordPress", "jQuery", "nginx"]);
}

#[test]
fn test_product_and_generator_helpers() {
    assert_eq!(product_name("nginx"), Some("nginx"));
    assert_eq!(product_name("Microsoft-IIS/10.0"), Some("Microsoft-IIS"));
    assert_eq!(product_name("   "), None);
    assert_eq!(generator_name("Hugo 0.120.4"), Some("Hugo".to_string()));
    assert_eq!(generator_name("Ghost v5.2"), Some("Ghost".to_string()));
    assert_eq!(
        generator_name("Joomla! - Open Source Content Management"),
        Some("Joomla!".to_string())
    );
    assert_eq!(generator_name("1.0"), None);
}

#[test]
fn test_known_globals_are_unique_and_cover_table() {
    let globals = known_globals();
    let mut sorted = globals.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), globals.len());
    assert!(globals.contains(&"jQuery"));
    assert!(globals.contains(&"__NEXT_DATA__"));
}

#[test]
fn test_all_signature_selectors_parse() {
    for (sig, selectors) in SIGNATURES.iter().zip(SIGNATURE_SELECTORS.iter()) {
        assert_eq!(sig.selectors.len(), selectors.len(), "{}", sig.name);
    }
}
