//! Human-readable report rendering.

use crate::models::SecurityReport;
use crate::utils::sanitize::{strip_control_chars as clean, truncate_for_display};

/// Header values longer than this are cut in the text report.
const HEADER_VALUE_DISPLAY_CHARS: usize = 60;
const DESCRIPTION_DISPLAY_CHARS: usize = 100;
/// Emails listed before the remainder is summarized.
const EMAILS_SHOWN: usize = 3;
const RULE_WIDTH: usize = 70;

/// Renders the report as terminal text.
///
/// Every page-supplied string has control characters removed so a hostile page
/// cannot inject terminal escape sequences.
pub fn render_report(report: &SecurityReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        "SECURITY REPORT".to_string(),
        rule.clone(),
        String::new(),
        "Page Information:".to_string(),
        format!("   URL: {}", clean(&report.url)),
    ];
    if report.final_url != report.url {
        lines.push(format!("   Final URL: {}", clean(&report.final_url)));
    }
    lines.push(format!("   Status Code: {}", report.status_code));
    lines.push(format!(
        "   Mode: {} ({} attempt{})",
        report.mode.as_str(),
        report.attempts,
        if report.attempts == 1 { "" } else { "s" }
    ));
    lines.push(format!(
        "   Title: {}",
        report.title.as_deref().map(clean).unwrap_or_else(|| "N/A".to_string())
    ));
    if let Some(description) = &report.description {
        lines.push(format!(
            "   Description: {}",
            truncate_for_display(&clean(description), DESCRIPTION_DISPLAY_CHARS)
        ));
    }

    if report.server.is_some()
        || report.powered_by.is_some()
        || report.generator.is_some()
        || !report.technologies.is_empty()
    {
        lines.push(String::new());
        lines.push("Server & Technology:".to_string());
        for (label, value) in [
            ("Server", &report.server),
            ("Powered By", &report.powered_by),
            ("Generator", &report.generator),
        ] {
            if let Some(value) = value {
                lines.push(format!("   {label}: {}", clean(value)));
            }
        }
        if !report.technologies.is_empty() {
            let names: Vec<String> = report.technologies.iter().map(|t| clean(t)).collect();
            lines.push(format!("   Detected: {}", names.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Security Headers:".to_string());
    if report.security_headers.is_empty() {
        lines.push("   ! No security headers found".to_string());
    }
    for (name, value) in &report.security_headers {
        lines.push(format!(
            "   + {name}: {}",
            truncate_for_display(&clean(value), HEADER_VALUE_DISPLAY_CHARS)
        ));
    }

    if !report.missing_important_headers.is_empty() {
        lines.push(String::new());
        lines.push("Missing Important Headers:".to_string());
        for name in &report.missing_important_headers {
            lines.push(format!("   - {name}"));
        }
    }

    lines.push(String::new());
    lines.push("Security.txt:".to_string());
    match (&report.security_txt.present, &report.security_txt.location) {
        (true, Some(location)) => lines.push(format!("   + Found at: {location}")),
        _ => lines.push("   - Not found".to_string()),
    }

    lines.push(String::new());
    lines.push("SSL/TLS:".to_string());
    match &report.ssl {
        Some(ssl) => {
            if ssl.verified {
                lines.push("   + Certificate valid".to_string());
            } else {
                lines.push("   - Certificate not verified".to_string());
            }
            if let Some(issuer) = &ssl.issuer {
                lines.push(format!("   Issuer: {}", clean(issuer)));
            }
            if let Some(protocol) = &ssl.protocol {
                lines.push(format!("   Protocol: {protocol}"));
            }
        }
        None => lines.push("   - Not served over HTTPS".to_string()),
    }

    lines.push(String::new());
    lines.push("Links:".to_string());
    lines.push(format!("   Internal: {}", report.internal_links.len()));
    lines.push(format!("   External: {}", report.external_links.len()));

    if !report.contact_emails.is_empty() {
        lines.push(String::new());
        lines.push("Extracted Emails (use responsibly):".to_string());
        for email in report.contact_emails.iter().take(EMAILS_SHOWN) {
            lines.push(format!("   * {}", clean(email)));
        }
        if report.contact_emails.len() > EMAILS_SHOWN {
            lines.push(format!(
                "   ... and {} more",
                report.contact_emails.len() - EMAILS_SHOWN
            ));
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Extraction Warnings:".to_string());
        for warning in &report.warnings {
            lines.push(format!("   ! {}", warning.as_str()));
        }
    }

    if report.has_critical_missing_headers() {
        lines.push(String::new());
        lines.push("CRITICAL: Important security headers are missing!".to_string());
        lines.push(format!(
            "   Consider implementing {}",
            report.critical_missing_headers().join(", ")
        ));
    }

    lines.push(String::new());
    lines.push(rule);
    lines.join("\n")
}
