//! Audit request modes
//!
//! The surrounding application asks for one of four modes. All of them end
//! in the single-page auditor or the batch orchestrator.

use crate::audit::{Auditor, ProgressCallback, MAX_PAGES};
use crate::cancel::CancelToken;
use crate::findings::AuditReport;
use crate::sitemap::{SitemapKind, SitemapResolver};
use crate::url::parse_target_url;
use crate::AuditError;

/// What to audit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRequest {
    /// One page
    Single(String),
    /// An operator-supplied list, capped at the page limit
    Custom(Vec<String>),
    /// A homepage and the same-host pages it links to
    Crawl(String),
    /// Pages from a sitemap; `selection` holds 1-based entry numbers, empty
    /// meaning the first entries up to the page limit
    Sitemap {
        sitemap_url: String,
        selection: Vec<usize>,
    },
}

/// Result of a request
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    /// Reports in request order
    Completed(Vec<AuditReport>),
    /// The request ran but there was nothing to audit
    NothingProcessed,
    /// The sitemap turned out to be an index; pick one of these child sitemaps
    SitemapIndex(Vec<String>),
}

impl AuditOutcome {
    fn from_reports(reports: Vec<AuditReport>) -> Self {
        if reports.is_empty() {
            Self::NothingProcessed
        } else {
            Self::Completed(reports)
        }
    }
}

/// Validates one URL and returns the operator's string, trimmed
///
/// Normalization is left to the fetch so report ids keep the supplied form.
fn required_url(input: &str, what: &str) -> Result<String, AuditError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidRequest(format!("a {} is required", what)));
    }
    parse_target_url(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|e| AuditError::InvalidRequest(format!("invalid {} '{}': {}", what, trimmed, e)))
}

/// Validates a pasted list: blank entries are dropped, the rest must parse
fn custom_urls(inputs: &[String]) -> Result<Vec<String>, AuditError> {
    let urls = inputs
        .iter()
        .filter(|input| !input.trim().is_empty())
        .take(MAX_PAGES)
        .map(|input| required_url(input, "URL"))
        .collect::<Result<Vec<_>, _>>()?;

    if urls.is_empty() {
        return Err(AuditError::InvalidRequest(
            "the URL list is empty".to_string(),
        ));
    }
    Ok(urls)
}

/// Picks the operator-selected sitemap entries (1-based)
fn select_entries(urls: &[String], selection: &[usize]) -> Result<Vec<String>, AuditError> {
    if selection.is_empty() {
        return Ok(urls.iter().take(MAX_PAGES).cloned().collect());
    }

    selection
        .iter()
        .take(MAX_PAGES)
        .map(|&number| {
            number
                .checked_sub(1)
                .and_then(|index| urls.get(index))
                .cloned()
                .ok_or_else(|| {
                    AuditError::InvalidRequest(format!(
                        "sitemap entry {} does not exist (sitemap has {} entries)",
                        number,
                        urls.len()
                    ))
                })
        })
        .collect()
}

impl Auditor {
    /// Creates a sitemap resolver sharing this auditor's relay
    pub fn sitemap_resolver(&self) -> SitemapResolver {
        SitemapResolver::new(self.relay().clone(), self.retry())
    }

    /// Validates and runs a request
    ///
    /// Per-page failures become degraded reports. Invalid requests, sitemap
    /// and homepage failures, and cancellation are returned as errors.
    pub async fn run_request(
        &self,
        request: &AuditRequest,
        on_progress: &ProgressCallback,
        cancel: &CancelToken,
    ) -> Result<AuditOutcome, AuditError> {
        match request {
            AuditRequest::Single(url) => {
                let url = required_url(url, "URL")?;
                on_progress(&format!("Auditing page 1 of 1: {}", url));
                let report = self.audit(&url, cancel).await?;
                Ok(AuditOutcome::Completed(vec![report]))
            }
            AuditRequest::Custom(urls) => {
                let urls = custom_urls(urls)?;
                let reports = self.audit_many(&urls, on_progress, cancel).await?;
                Ok(AuditOutcome::from_reports(reports))
            }
            AuditRequest::Crawl(url) => {
                let url = required_url(url, "homepage URL")?;
                let reports = self.crawl_and_audit(&url, on_progress, cancel).await?;
                Ok(AuditOutcome::from_reports(reports))
            }
            AuditRequest::Sitemap {
                sitemap_url,
                selection,
            } => {
                let sitemap_url = parse_target_url(&required_url(sitemap_url, "sitemap URL")?)?.to_string();
                on_progress(&format!("Resolving sitemap {}", sitemap_url));
                let parsed = self.sitemap_resolver().resolve(&sitemap_url, cancel).await?;

                match parsed.kind {
                    SitemapKind::Index => Ok(AuditOutcome::SitemapIndex(parsed.urls)),
                    SitemapKind::Urlset => {
                        let urls = select_entries(&parsed.urls, selection)?;
                        let reports = self.audit_many(&urls, on_progress, cancel).await?;
                        Ok(AuditOutcome::from_reports(reports))
                    }
                }
            }
        }
    }
}
