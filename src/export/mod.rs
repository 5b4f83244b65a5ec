//! Report export.
//!
//! This module writes a finished [`SecurityReport`](crate::SecurityReport) to
//! disk:
//! - pretty JSON, to a chosen path or an auto-named file in a directory
//! - CSV of discovered links (`url,kind`)

mod csv;
mod json;

pub use csv::{export_links_csv, link_rows, write_links_csv};
pub use json::{
    report_file_name, report_to_json, write_json_report, write_json_report_in,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_report;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_report_file_name() {
        let at = Local.with_ymd_and_hms(2026, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(
            report_file_name("https://www.example.com/a?b=c", at),
            "report_www.example.com_a_b_c_20260301_090507.json"
        );
    }

    #[test]
    fn test_json_roundtrips_field_names() {
        let json = report_to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status_code"], 200);
        assert_eq!(
            value["missing_important_headers"][0],
            "Strict-Transport-Security"
        );
        assert!(json.contains('\n'), "output is pretty-printed");
    }

    #[test]
    fn test_write_json_report_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        write_json_report(&sample_report(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["url"], "https://example.com");
    }

    #[test]
    fn test_write_json_report_in_uses_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json_report_in(&sample_report(), dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("report_example.com_"), "{name}");
        assert!(name.ends_with(".json"));
        assert!(path.exists());
    }

    #[test]
    fn test_links_csv_sorted_with_header() {
        let mut out = Vec::new();
        let count = write_links_csv(&sample_report(), &mut out).unwrap();
        assert_eq!(count, 3);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "url,kind",
                "https://other.org/,external",
                "https://www.example.com/about,internal",
                "https://www.example.com/contact,internal",
            ]
        );
    }

    #[test]
    fn test_export_links_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.csv");
        assert_eq!(export_links_csv(&sample_report(), &path).unwrap(), 3);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("url,kind"));
    }
}
