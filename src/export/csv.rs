//! CSV export of discovered links.
//!
//! One row per link, `url,kind` where kind is `internal` or `external`.
//! Rows are sorted by URL, then kind.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::Writer;
use log::info;

use crate::error_handling::ExportError;
use crate::models::SecurityReport;

/// Link rows of the report, sorted.
pub fn link_rows(report: &SecurityReport) -> Vec<(&str, &'static str)> {
    let mut rows: Vec<(&str, &'static str)> = report
        .internal_links
        .iter()
        .map(|url| (url.as_str(), "internal"))
        .chain(
            report
                .external_links
                .iter()
                .map(|url| (url.as_str(), "external")),
        )
        .collect();
    rows.sort_unstable();
    rows
}

/// Writes the link rows with a header line to `out`. Returns the row count.
pub fn write_links_csv<W: Write>(report: &SecurityReport, out: W) -> Result<usize, ExportError> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(["url", "kind"])?;
    let rows = link_rows(report);
    for (url, kind) in &rows {
        writer.write_record([*url, *kind])?;
    }
    writer.flush()?;
    Ok(rows.len())
}

/// Writes the link CSV to `path`, creating parent directories.
pub fn export_links_csv(report: &SecurityReport, path: &Path) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let count = write_links_csv(report, File::create(path)?)?;
    info!("Exported {count} links to {}", path.display());
    Ok(count)
}
