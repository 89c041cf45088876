//! Narrative generator contract
//!
//! Turning findings into prose is delegated to an external generator, usually
//! a conversational model. This module defines what the engine hands over:
//! well-formed reports, the failing and warning findings per page, aggregate
//! scores, and the conversation so far.

use crate::findings::{AuditReport, Finding};
use crate::output::BatchStatistics;
use serde::Serialize;
use std::fmt::Write;

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Operator,
    Assistant,
}

/// One turn of the remediation conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Non-passing findings for one page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIssues<'a> {
    pub url: &'a str,
    pub seo_score: u8,
    pub geo_score: u8,
    pub issues: Vec<&'a Finding>,
}

/// Everything a narrative generator receives
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContext<'a> {
    pub pages: Vec<PageIssues<'a>>,
    pub average_seo: u8,
    pub average_geo: u8,
    pub transcript: &'a [TranscriptEntry],
}

impl<'a> NarrativeContext<'a> {
    /// Context for a single page
    pub fn for_report(report: &'a AuditReport, transcript: &'a [TranscriptEntry]) -> Self {
        Self::for_batch(std::slice::from_ref(report), transcript)
    }

    /// Context for a batch, with average scores across it
    pub fn for_batch(reports: &'a [AuditReport], transcript: &'a [TranscriptEntry]) -> Self {
        let stats = BatchStatistics::from_reports(reports);
        let pages = reports
            .iter()
            .map(|report| PageIssues {
                url: &report.url,
                seo_score: report.seo_score,
                geo_score: report.geo_score,
                issues: report.issues().collect(),
            })
            .collect();

        Self {
            pages,
            average_seo: stats.average_seo,
            average_geo: stats.average_geo,
            transcript,
        }
    }

    /// Total number of non-passing findings
    pub fn issue_count(&self) -> usize {
        self.pages.iter().map(|page| page.issues.len()).sum()
    }
}

/// Produces prose from audit results
pub trait NarrativeGenerator {
    type Error: std::error::Error;

    fn generate(&self, context: &NarrativeContext<'_>) -> Result<String, Self::Error>;
}

/// Deterministic plain-text summary, used when no model is attached
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryNarrator;

impl NarrativeGenerator for SummaryNarrator {
    type Error = std::fmt::Error;

    fn generate(&self, context: &NarrativeContext<'_>) -> Result<String, Self::Error> {
        let mut text = String::new();

        if context.pages.len() == 1 {
            let page = &context.pages[0];
            writeln!(
                text,
                "{} scores {}/100 for SEO and {}/100 for GEO.",
                page.url, page.seo_score, page.geo_score
            )?;
        } else {
            writeln!(
                text,
                "Across {} pages the average SEO score is {}/100 and the average GEO score is {}/100.",
                context.pages.len(),
                context.average_seo,
                context.average_geo
            )?;
        }

        if context.issue_count() == 0 {
            writeln!(text, "No issues need attention.")?;
            return Ok(text);
        }

        for page in context.pages.iter().filter(|page| !page.issues.is_empty()) {
            writeln!(text)?;
            writeln!(text, "{}:", page.url)?;
            for finding in &page.issues {
                writeln!(
                    text,
                    "- {} ({}): {}",
                    finding.check_name, finding.status, finding.message
                )?;
            }
        }

        Ok(text)
    }
}
