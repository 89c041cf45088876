//! Markdown report generation
//!
//! This module renders audit reports as human-readable markdown: a run header,
//! batch statistics, a score table, and each page's findings with evidence.

use crate::findings::{AnchorRecord, AuditReport, CheckStatus, DataValue, FindingData, LinkRel};
use crate::output::BatchStatistics;
use chrono::{DateTime, Utc};

/// Anchors listed per finding before the rest are summarized
const MAX_LISTED_ANCHORS: usize = 20;

/// Formats a batch of reports as markdown
///
/// # Arguments
///
/// * `reports` - Reports in request order
/// * `generated_at` - Timestamp printed in the header
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(reports: &[AuditReport], generated_at: DateTime<Utc>) -> String {
    let stats = BatchStatistics::from_reports(reports);
    let mut md = String::new();

    md.push_str("# Geo-Audit Report\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Pages Audited**: {}\n", stats.total_pages));
    md.push_str(&format!("- **Average SEO Score**: {}/100\n", stats.average_seo));
    md.push_str(&format!("- **Average GEO Score**: {}/100\n", stats.average_geo));
    if stats.degraded_pages > 0 {
        md.push_str(&format!(
            "- **Unreachable Pages**: {} ({:.1}% audited)\n",
            stats.degraded_pages,
            stats.success_rate()
        ));
    }
    md.push('\n');

    md.push_str("## Findings Breakdown\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pass | {} |\n", stats.passed));
    md.push_str(&format!("| Warning | {} |\n", stats.warnings));
    md.push_str(&format!("| Fail | {} |\n\n", stats.failures));

    md.push_str("## Scores\n\n");
    md.push_str("| # | Page | SEO | GEO |\n");
    md.push_str("|---|------|-----|-----|\n");
    for (index, report) in reports.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            index + 1,
            escape_cell(&report.url),
            report.seo_score,
            report.geo_score
        ));
    }
    md.push('\n');

    for report in reports {
        md.push_str(&format_page(report));
    }

    md
}

fn format_page(report: &AuditReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("## {}\n\n", report.url));
    if report.id != report.url {
        md.push_str(&format!("- **Requested**: {}\n", report.id));
    }
    md.push_str(&format!("- **SEO Score**: {}/100\n", report.seo_score));
    md.push_str(&format!("- **GEO Score**: {}/100\n\n", report.geo_score));

    for finding in &report.findings {
        md.push_str(&format!(
            "### {} {}: {}\n\n",
            status_marker(finding.status),
            finding.check_name,
            finding.status
        ));
        md.push_str(&format!("{}\n\n", finding.message));

        if let Some(data) = &finding.data {
            md.push_str(&format_evidence(data));
            md.push('\n');
        }
    }

    md
}

fn status_marker(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "[PASS]",
        CheckStatus::Warning => "[WARN]",
        CheckStatus::Fail => "[FAIL]",
    }
}

fn format_evidence(data: &FindingData) -> String {
    match data {
        FindingData::Text(text) => format!("> {}\n", text),
        FindingData::List(items) => items.iter().map(|item| format!("- {}\n", item)).collect(),
        FindingData::Table(table) => {
            let mut md = String::from("| Field | Value |\n|-------|-------|\n");
            for (key, value) in table {
                match value {
                    DataValue::Anchors(anchors) => {
                        md.push_str(&format!("| {} | {} anchors |\n", escape_cell(key), anchors.len()));
                    }
                    other => {
                        md.push_str(&format!(
                            "| {} | {} |\n",
                            escape_cell(key),
                            escape_cell(&format_value(other))
                        ));
                    }
                }
            }
            // Anchor lists are too wide for a cell; list them after the table
            for value in table.values() {
                if let DataValue::Anchors(anchors) = value {
                    md.push('\n');
                    md.push_str(&format_anchors(anchors));
                }
            }
            md
        }
    }
}

fn format_value(value: &DataValue) -> String {
    match value {
        DataValue::Text(text) => text.clone(),
        DataValue::Count(count) => count.to_string(),
        DataValue::Percent(percent) => format!("{:.1}%", percent),
        DataValue::List(items) => items.join(", "),
        DataValue::Anchors(anchors) => format!("{} anchors", anchors.len()),
    }
}

fn format_anchors(anchors: &[AnchorRecord]) -> String {
    let mut md = String::new();
    for anchor in anchors.iter().take(MAX_LISTED_ANCHORS) {
        let text = if anchor.text.is_empty() {
            "(no text)"
        } else {
            anchor.text.as_str()
        };
        md.push_str(&format!(
            "- {} -> {} ({}, {})\n",
            text,
            anchor.href,
            if anchor.is_internal { "internal" } else { "external" },
            match anchor.rel {
                LinkRel::Dofollow => "dofollow",
                LinkRel::Nofollow => "nofollow",
            }
        ));
    }
    if anchors.len() > MAX_LISTED_ANCHORS {
        md.push_str(&format!(
            "\n... and {} more\n",
            anchors.len() - MAX_LISTED_ANCHORS
        ));
    }
    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
