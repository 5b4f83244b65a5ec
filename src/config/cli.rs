//! Command-line options.
//!
//! `Opt` is the clap definition used by the binary. It converts into the
//! library's [`ScanConfig`] so the core never depends on argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::constants::DEFAULT_CONTACT_EMAIL;
use crate::config::types::{FetchMode, LogFormat, LogLevel, RobotsFailureMode, ScanConfig};

/// Security posture scanner for a single site.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "site_posture",
    version,
    about = "Fetch one page and report its HTTP security posture",
    after_help = "Respect robots.txt and rate limits. Only scan sites you are permitted to assess."
)]
pub struct Opt {
    /// Target URL (https:// is assumed when no scheme is given)
    pub url: String,

    /// Render the page in a headless browser before extraction
    #[arg(short, long)]
    pub dynamic: bool,

    /// Show the browser window while rendering (dynamic mode)
    #[arg(long, requires = "dynamic")]
    pub headful: bool,

    /// Contact email embedded in request headers
    #[arg(short, long, env = "SITE_POSTURE_CONTACT_EMAIL", default_value = DEFAULT_CONTACT_EMAIL)]
    pub email: String,

    /// Ignore robots.txt restrictions
    #[arg(long)]
    pub ignore_robots: bool,

    /// What to do when robots.txt cannot be fetched
    #[arg(long, value_enum, default_value_t = RobotsFailureMode::Allow)]
    pub robots_unreachable: RobotsFailureMode,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15.0)]
    pub timeout: f64,

    /// Maximum retry attempts for transient failures
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Minimum delay between requests to the same domain, in seconds
    #[arg(long, default_value_t = 2.5)]
    pub min_delay: f64,

    /// Maximum delay between requests to the same domain, in seconds
    #[arg(long, default_value_t = 7.0)]
    pub max_delay: f64,

    /// Skip inter-request delays
    #[arg(long)]
    pub no_delay: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for auto-named JSON reports
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Export discovered links to a CSV file
    #[arg(long)]
    pub links_csv: Option<PathBuf>,

    /// Print only the JSON report
    #[arg(long)]
    pub json_only: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<&Opt> for ScanConfig {
    fn from(opt: &Opt) -> Self {
        let (min_delay, max_delay) = if opt.no_delay {
            (0.0, 0.0)
        } else {
            (opt.min_delay, opt.max_delay)
        };
        ScanConfig {
            mode: if opt.dynamic {
                FetchMode::Dynamic
            } else {
                FetchMode::Static
            },
            respect_robots: !opt.ignore_robots,
            contact_email: opt.email.clone(),
            timeout_seconds: opt.timeout,
            max_retries: opt.max_retries,
            min_delay,
            max_delay,
            robots_unreachable: opt.robots_unreachable,
            headless: !opt.headful,
            ..ScanConfig::default()
        }
    }
}
