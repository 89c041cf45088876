//! Batch statistics over audit reports

use crate::findings::{AuditReport, CheckStatus};
use serde::Serialize;

/// Aggregate figures for a batch of reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    /// Number of reports in the batch
    pub total_pages: usize,

    /// Mean SEO score, rounded; 0 for an empty batch
    pub average_seo: u8,

    /// Mean GEO score, rounded; 0 for an empty batch
    pub average_geo: u8,

    /// Pages that could not be fetched
    pub degraded_pages: usize,

    /// Findings by status across every page
    pub passed: usize,
    pub warnings: usize,
    pub failures: usize,
}

impl BatchStatistics {
    pub fn from_reports(reports: &[AuditReport]) -> Self {
        let mut stats = Self {
            total_pages: reports.len(),
            ..Self::default()
        };

        if reports.is_empty() {
            return stats;
        }

        let (mut seo_total, mut geo_total) = (0u32, 0u32);
        for report in reports {
            seo_total += u32::from(report.seo_score);
            geo_total += u32::from(report.geo_score);
            if report.is_degraded() {
                stats.degraded_pages += 1;
            }
            for finding in &report.findings {
                match finding.status {
                    CheckStatus::Pass => stats.passed += 1,
                    CheckStatus::Warning => stats.warnings += 1,
                    CheckStatus::Fail => stats.failures += 1,
                }
            }
        }

        stats.average_seo = average(seo_total, reports.len());
        stats.average_geo = average(geo_total, reports.len());
        stats
    }

    /// Share of pages that were fetched and audited, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        let audited = self.total_pages - self.degraded_pages;
        (audited as f64 / self.total_pages as f64) * 100.0
    }
}

fn average(total: u32, count: usize) -> u8 {
    let mean = (f64::from(total) / count as f64).round();
    mean.clamp(0.0, 100.0) as u8
}
