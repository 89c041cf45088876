//! Output module for rendering audit reports
//!
//! This module handles:
//! - Rendering reports as markdown or JSON
//! - Computing batch statistics
//! - Writing the rendered report to stdout or a file

mod markdown;
pub mod stats;

pub use markdown::format_markdown_report;
pub use stats::BatchStatistics;

use crate::config::OutputFormat;
use crate::findings::AuditReport;
use crate::AuditError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON document wrapping a batch of reports
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    statistics: BatchStatistics,
    reports: &'a [AuditReport],
}

/// Formats a batch of reports as pretty-printed JSON
pub fn format_json_report(reports: &[AuditReport], generated_at: DateTime<Utc>) -> Result<String, AuditError> {
    let document = JsonReport {
        generated_at,
        statistics: BatchStatistics::from_reports(reports),
        reports,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Renders reports in the requested format, stamped with the current time
pub fn render_reports(reports: &[AuditReport], format: OutputFormat) -> Result<String, AuditError> {
    let now = Utc::now();
    match format {
        OutputFormat::Markdown => Ok(format_markdown_report(reports, now)),
        OutputFormat::Json => format_json_report(reports, now),
    }
}

/// Writes rendered output to `path`, or to stdout when no path is given
///
/// # Returns
///
/// * `Ok(())` - Output written
/// * `Err(AuditError::Io)` - The file or stdout could not be written
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), AuditError> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
