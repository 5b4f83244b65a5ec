//! JSON report export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::error_handling::ExportError;
use crate::models::SecurityReport;
use crate::utils::sanitize::sanitize_for_filename;

/// Longest URL-derived fragment embedded in an auto-generated file name.
const MAX_NAME_FRAGMENT: usize = 80;

/// Pretty-printed JSON of the report.
pub fn report_to_json(report: &SecurityReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// File name `report_<sanitized-url>_<YYYYmmdd_HHMMSS>.json`.
pub fn report_file_name(url: &str, at: DateTime<Local>) -> String {
    format!(
        "report_{}_{}.json",
        sanitize_for_filename(url, MAX_NAME_FRAGMENT),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes the report as pretty JSON to `path`, creating parent directories.
pub fn write_json_report(report: &SecurityReport, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Writes the report into `dir` under an auto-generated name and returns the path.
pub fn write_json_report_in(report: &SecurityReport, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(report_file_name(&report.url, Local::now()));
    write_json_report(report, &path)?;
    Ok(path)
}
