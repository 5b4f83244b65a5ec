//! End-to-end scans through the public API.
//!
//! Pages are served by `httptest` mock servers and fetched with the real static
//! strategy, except where a scripted fetch strategy is needed to produce
//! failures a plain HTTP mock cannot (repeated 503s with a fixed count,
//! certificate errors).

mod helpers;

use httptest::{matchers::*, responders::*, Expectation, Server};
use site_posture::{
    DenyReason, ErrorKind, ExtractionWarning, FetchError, FetchMode, RobotsFailureMode,
    ScanConfig, ScanError, Scanner,
};

use helpers::{fast_config, mock_site, raw_page, ScriptedFetcher};

const LANDING_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>  Example   Landing </title>
  <meta name="description" content="A page used for scanning">
  <meta name="generator" content="WordPress 6.4.2">
  <script src="/static/jquery.min.js"></script>
</head>
<body>
  <a href="/about">About</a>
  <a href="/contact#form">Contact</a>
  <a href="https://partner.example.org/page">Partner</a>
  <a href="mailto:Security@Example.com">Report a vulnerability</a>
  <a href="#top">Top</a>
  <a href="javascript:void(0)">Nothing</a>
  <p>Press enquiries: press@example.com</p>
</body>
</html>"##;

/// Serves LANDING_PAGE at `/` with CSP and X-Frame-Options only.
fn landing_site() -> Server {
    let server = mock_site("User-agent: *\nDisallow: /private\n");
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .times(..)
            .respond_with(
                status_code(200)
                    .insert_header("Content-Type", "text/html; charset=utf-8")
                    .insert_header("Content-Security-Policy", "default-src 'self'")
                    .insert_header("X-Frame-Options", "DENY")
                    .insert_header("Server", "nginx/1.25.3")
                    .body(LANDING_PAGE),
            ),
    );
    server
}

#[tokio::test]
async fn test_static_scan_reports_missing_headers() {
    let server = landing_site();
    let scanner = Scanner::new(fast_config()).expect("valid config");

    let report = scanner
        .scan(&server.url_str("/"))
        .await
        .expect("scan should succeed");

    assert_eq!(report.status_code, 200);
    assert_eq!(report.mode, FetchMode::Static);
    assert_eq!(report.attempts, 1);
    assert_eq!(
        report.missing_important_headers,
        vec!["Strict-Transport-Security", "X-Content-Type-Options"]
    );
    assert_eq!(
        report.security_headers.get("Content-Security-Policy").map(String::as_str),
        Some("default-src 'self'")
    );
    assert_eq!(
        report.security_headers.get("X-Frame-Options").map(String::as_str),
        Some("DENY")
    );
    assert!(report.has_critical_missing_headers());
    assert_eq!(report.critical_missing_headers(), vec!["Strict-Transport-Security"]);
}

#[tokio::test]
async fn test_static_scan_extracts_page_fields() {
    let server = landing_site();
    let scanner = Scanner::new(fast_config()).expect("valid config");

    let report = scanner.scan(&server.url_str("/")).await.unwrap();

    assert_eq!(report.title.as_deref(), Some("Example Landing"));
    assert_eq!(report.description.as_deref(), Some("A page used for scanning"));
    assert_eq!(report.generator.as_deref(), Some("WordPress 6.4.2"));
    assert_eq!(report.server.as_deref(), Some("nginx/1.25.3"));
    assert!(report.technologies.contains("nginx"));
    assert!(report.technologies.contains("WordPress"));
    assert!(report.technologies.contains("jQuery"));
    // plain http: no TLS section
    assert_eq!(report.ssl, None);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert!(!report.security_txt.present);
}

#[tokio::test]
async fn test_links_are_partitioned_by_site() {
    let server = landing_site();
    let scanner = Scanner::new(fast_config()).unwrap();

    let report = scanner.scan(&server.url_str("/")).await.unwrap();

    let internal: Vec<&str> = report.internal_links.iter().map(String::as_str).collect();
    assert_eq!(
        internal,
        vec![
            server.url_str("/about").as_str(),
            server.url_str("/contact").as_str(),
        ]
    );
    let external: Vec<&str> = report.external_links.iter().map(String::as_str).collect();
    assert_eq!(external, vec!["https://partner.example.org/page"]);
    assert!(report.internal_links.is_disjoint(&report.external_links));
}

#[tokio::test]
async fn test_contact_emails_from_text_and_mailto() {
    let server = landing_site();
    let scanner = Scanner::new(fast_config()).unwrap();

    let report = scanner.scan(&server.url_str("/")).await.unwrap();

    let emails: Vec<&str> = report.contact_emails.iter().map(String::as_str).collect();
    assert_eq!(emails, vec!["press@example.com", "security@example.com"]);
}

#[tokio::test]
async fn test_repeated_scans_are_identical_apart_from_timestamp() {
    let server = landing_site();
    let scanner = Scanner::new(fast_config()).unwrap();
    let url = server.url_str("/");

    let first = scanner.scan(&url).await.unwrap();
    let mut second = scanner.scan(&url).await.unwrap();
    second.timestamp = first.timestamp;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_robots_disallow_denies_without_fetching() {
    let server = mock_site("User-agent: *\nDisallow: /private\n");
    let fetcher = ScriptedFetcher::new(vec![Ok(raw_page("http://unused/", &[], ""))]);
    let scanner = Scanner::with_fetcher(fast_config(), &fetcher).unwrap();

    let err = scanner
        .scan(&server.url_str("/private/page"))
        .await
        .expect_err("path is disallowed");

    assert_eq!(err.kind(), ErrorKind::PolicyDenied);
    assert_eq!(err.attempts(), 0);
    assert!(matches!(
        err,
        ScanError::PolicyDenied {
            reason: DenyReason::Disallowed { .. },
            ..
        }
    ));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_ignore_robots_skips_policy() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/robots.txt"))
            .times(0)
            .respond_with(status_code(200).body("User-agent: *\nDisallow: /\n")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", matches("security\\.txt$")))
            .times(..)
            .respond_with(status_code(404)),
    );
    let target = server.url_str("/private");
    let fetcher = ScriptedFetcher::new(vec![Ok(raw_page(&target, &[], "<title>x</title>"))]);
    let config = ScanConfig {
        respect_robots: false,
        ..fast_config()
    };
    let scanner = Scanner::with_fetcher(config, &fetcher).unwrap();

    let report = scanner.scan(&target).await.unwrap();
    assert_eq!(report.title.as_deref(), Some("x"));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_unreachable_robots_fail_closed_when_configured() {
    // 5xx counts as unreachable, unlike 404
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/robots.txt"))
            .times(..)
            .respond_with(status_code(500)),
    );
    let fetcher = ScriptedFetcher::new(Vec::new());
    let config = ScanConfig {
        robots_unreachable: RobotsFailureMode::Deny,
        ..fast_config()
    };
    let scanner = Scanner::with_fetcher(config, &fetcher).unwrap();

    let err = scanner.scan(&server.url_str("/")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PolicyDenied);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_transient_failures_retried_until_success() {
    let server = mock_site("");
    let target = server.url_str("/");
    let unavailable = || {
        Err(FetchError::Http {
            status: 503,
            retry_after: None,
        })
    };
    let fetcher = ScriptedFetcher::new(vec![
        unavailable(),
        unavailable(),
        unavailable(),
        Ok(raw_page(&target, &[], "<title>back</title>")),
    ]);
    let config = ScanConfig {
        max_retries: 5,
        ..fast_config()
    };
    let scanner = Scanner::with_fetcher(config, &fetcher).unwrap();

    let report = scanner.scan(&target).await.unwrap();
    assert_eq!(report.status_code, 200);
    assert_eq!(report.attempts, 4);
    assert_eq!(fetcher.calls(), 4);
}

#[tokio::test]
async fn test_certificate_failure_is_final() {
    let fetcher = ScriptedFetcher::new(vec![Err(FetchError::Ssl(
        "invalid peer certificate: NotValidForName".into(),
    ))]);
    let config = ScanConfig {
        respect_robots: false,
        ..fast_config()
    };
    let scanner = Scanner::with_fetcher(config, &fetcher).unwrap();

    let err = scanner
        .scan("https://wrong.host.example.com/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SslError);
    assert_eq!(err.attempts(), 1);
    assert_eq!(fetcher.calls(), 1);

    let failure = err.to_failure();
    assert_eq!(failure.url, "https://wrong.host.example.com/");
    assert_eq!(failure.attempts, 1);
}

#[tokio::test]
async fn test_page_without_title() {
    let server = mock_site("");
    server.expect(
        Expectation::matching(request::method_path("GET", "/bare"))
            .respond_with(status_code(200).body("<html><body><p>no head</p></body></html>")),
    );
    let scanner = Scanner::new(fast_config()).unwrap();

    let report = scanner.scan(&server.url_str("/bare")).await.unwrap();
    assert_eq!(report.title, None);
    assert_eq!(report.description, None);
    assert!(report.warnings.contains(&ExtractionWarning::MissingTitle));
    assert!(report.warnings.contains(&ExtractionWarning::MissingDescription));
}

#[tokio::test]
async fn test_not_found_page_is_permanent_failure() {
    let server = mock_site("");
    server.expect(
        Expectation::matching(request::method_path("GET", "/gone"))
            .times(1)
            .respond_with(status_code(404)),
    );
    let scanner = Scanner::new(fast_config()).unwrap();

    let err = scanner.scan(&server.url_str("/gone")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpError);
    assert_eq!(err.attempts(), 1);
}

#[tokio::test]
async fn test_security_txt_in_well_known_location() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/robots.txt"))
            .respond_with(status_code(404)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .respond_with(status_code(200).body("<title>home</title>")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/.well-known/security.txt"))
            .respond_with(status_code(200).body("Contact: mailto:security@example.com\n")),
    );
    let scanner = Scanner::new(fast_config()).unwrap();

    let report = scanner.scan(&server.url_str("/")).await.unwrap();
    assert!(report.security_txt.present);
    assert_eq!(
        report.security_txt.location,
        Some(server.url_str("/.well-known/security.txt"))
    );
}

#[tokio::test]
async fn test_invalid_input_is_config_error() {
    let scanner = Scanner::new(fast_config()).unwrap();
    let err = scanner.scan("ftp://example.com/file").await.unwrap_err();
    assert!(matches!(err, ScanError::Config { .. }));
    assert_eq!(err.kind(), ErrorKind::ConfigError);
}
