// Domain module tests.

use super::*;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_registrable_domain_basic() {
    assert_eq!(
        registrable_domain("www.example.com"),
        Some("example.com".to_string())
    );
}

#[test]
fn test_registrable_domain_multi_part_suffix() {
    assert_eq!(
        registrable_domain("shop.example.co.uk"),
        Some("example.co.uk".to_string())
    );
}

#[test]
fn test_registrable_domain_case_and_trailing_dot() {
    assert_eq!(
        registrable_domain("WWW.Example.COM."),
        Some("example.com".to_string())
    );
}

#[test]
fn test_registrable_domain_rejects_ips_and_single_labels() {
    assert_eq!(registrable_domain("127.0.0.1"), None);
    assert_eq!(registrable_domain("::1"), None);
    assert_eq!(registrable_domain("localhost"), None);
}

#[test]
fn test_domain_key_subdomains_share_key() {
    assert_eq!(
        domain_key(&url("https://a.b.example.com/path")),
        Some("example.com".to_string())
    );
    assert_eq!(
        domain_key(&url("http://example.com:8080/")),
        Some("example.com".to_string())
    );
}

#[test]
fn test_domain_key_ip_includes_port() {
    assert_eq!(
        domain_key(&url("http://127.0.0.1:8080/x")),
        Some("127.0.0.1:8080".to_string())
    );
    assert_eq!(
        domain_key(&url("https://127.0.0.1/")),
        Some("127.0.0.1:443".to_string())
    );
}

#[test]
fn test_domain_key_no_host() {
    assert_eq!(domain_key(&url("mailto:someone@example.com")), None);
}

#[test]
fn test_same_site() {
    assert!(same_site(
        &url("https://www.example.com/"),
        &url("https://blog.example.com/post")
    ));
    assert!(!same_site(
        &url("https://example.com/"),
        &url("https://example.org/")
    ));
    assert!(!same_site(
        &url("http://127.0.0.1:8000/"),
        &url("http://127.0.0.2:8000/")
    ));
}

#[test]
fn test_same_site_ignores_scheme_and_port_for_ip_hosts() {
    let secure = url("https://10.0.0.1/");
    let plain = url("http://10.0.0.1/x");
    assert!(same_site(&secure, &plain));
    assert!(same_site(&url("http://localhost:3000/"), &url("https://LOCALHOST/")));
    assert!(same_site(&url("https://[::1]/"), &url("http://[::1]:8080/")));

    // rate limiting still keeps the two ports apart
    assert_ne!(domain_key(&secure), domain_key(&plain));
}
