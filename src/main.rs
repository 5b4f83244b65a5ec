//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `site_posture` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Saving and printing the report
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use site_posture::app::{cancel_on_ctrl_c, normalize_url_input, render_report};
use site_posture::config::Opt;
use site_posture::export::{
    export_links_csv, report_to_json, write_json_report, write_json_report_in,
};
use site_posture::initialization::{init_crypto_provider, init_logger_with};
use site_posture::{ScanConfig, ScanError, Scanner, SecurityReport};
use tokio_util::sync::CancellationToken;

const EXIT_SCAN_FAILED: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Load SITE_POSTURE_CONTACT_EMAIL and friends from .env, trying the current
    // directory first and then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let scanner = match Scanner::new(ScanConfig::from(&opt)) {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("site_posture error: {e}");
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let cancel = CancellationToken::new();
    let signal_task = cancel_on_ctrl_c(cancel.clone());

    let target = normalize_url_input(&opt.url);
    let result = scanner.scan_with_cancel(&target, &cancel).await;
    signal_task.abort();

    match result {
        Ok(report) => {
            let saved_to = save_outputs(&opt, &report)?;
            if opt.json_only {
                println!("{}", report_to_json(&report)?);
            } else {
                print!("{}", render_report(&report));
                println!("Report saved to {}", saved_to.display());
            }
            Ok(())
        }
        Err(e) => {
            if opt.json_only {
                let failure = serde_json::to_string_pretty(&e.to_failure())
                    .context("Failed to serialize scan failure")?;
                println!("{failure}");
            } else {
                eprintln!("site_posture error: {e}");
            }
            process::exit(exit_code(&e));
        }
    }
}

/// Writes the JSON report (and the links CSV when requested), returning the
/// JSON report's path.
fn save_outputs(opt: &Opt, report: &SecurityReport) -> Result<std::path::PathBuf> {
    let json_path = match &opt.output {
        Some(path) => {
            write_json_report(report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            path.clone()
        }
        None => write_json_report_in(report, &opt.output_dir).with_context(|| {
            format!("Failed to write report into {}", opt.output_dir.display())
        })?,
    };

    if let Some(csv_path) = &opt.links_csv {
        let rows = export_links_csv(report, csv_path)
            .with_context(|| format!("Failed to write links to {}", csv_path.display()))?;
        if !opt.json_only {
            println!("Exported {rows} link(s) to {}", csv_path.display());
        }
    }

    Ok(json_path)
}

fn exit_code(error: &ScanError) -> i32 {
    match error {
        ScanError::Config { .. } => EXIT_CONFIG_ERROR,
        _ => EXIT_SCAN_FAILED,
    }
}
