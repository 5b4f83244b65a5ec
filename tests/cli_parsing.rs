//! Tests for command-line parsing and its conversion into a scan configuration.

use clap::Parser;
use site_posture::app::normalize_url_input;
use site_posture::config::Opt;
use site_posture::{FetchMode, LogFormat, RobotsFailureMode, ScanConfig};
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let opt = Opt::try_parse_from(["site_posture", "example.com"]).unwrap();

    assert_eq!(opt.output, None);
    assert_eq!(opt.output_dir, PathBuf::from("output"));
    assert_eq!(opt.links_csv, None);
    assert!(!opt.json_only);
    assert!(matches!(opt.log_format, LogFormat::Plain));
    assert_eq!(opt.robots_unreachable, RobotsFailureMode::Allow);

    let config = ScanConfig::from(&opt);
    assert_eq!(config.mode, FetchMode::Static);
    assert!(config.respect_robots);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.timeout_seconds, 15.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_output_flags() {
    let opt = Opt::try_parse_from([
        "site_posture",
        "https://example.com",
        "--output",
        "reports/example.json",
        "--links-csv",
        "links.csv",
        "--json-only",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert_eq!(opt.output, Some(PathBuf::from("reports/example.json")));
    assert_eq!(opt.links_csv, Some(PathBuf::from("links.csv")));
    assert!(opt.json_only);
    assert!(matches!(opt.log_format, LogFormat::Json));
}

#[test]
fn test_delay_flags() {
    let opt = Opt::try_parse_from([
        "site_posture",
        "example.com",
        "--min-delay",
        "1",
        "--max-delay",
        "2.5",
    ])
    .unwrap();
    let config = ScanConfig::from(&opt);
    assert_eq!(config.min_delay, 1.0);
    assert_eq!(config.max_delay, 2.5);

    let inverted = Opt::try_parse_from([
        "site_posture",
        "example.com",
        "--min-delay",
        "5",
        "--max-delay",
        "1",
    ])
    .unwrap();
    assert!(ScanConfig::from(&inverted).validate().is_err());
}

#[test]
fn test_missing_url_is_rejected() {
    assert!(Opt::try_parse_from(["site_posture"]).is_err());
}

#[test]
fn test_unknown_robots_mode_is_rejected() {
    assert!(Opt::try_parse_from([
        "site_posture",
        "example.com",
        "--robots-unreachable",
        "maybe"
    ])
    .is_err());
}

#[test]
fn test_bare_host_gets_https() {
    let opt = Opt::try_parse_from(["site_posture", "example.com/path"]).unwrap();
    assert_eq!(normalize_url_input(&opt.url), "https://example.com/path");
    assert_eq!(
        normalize_url_input("http://example.com"),
        "http://example.com"
    );
}
