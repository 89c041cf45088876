//! Batch auditing and single-level crawling
//!
//! Pages in a batch are audited concurrently, bounded only by the page cap.
//! Results come back in input order regardless of completion order.

use crate::audit::Auditor;
use crate::cancel::{CancelToken, Cancelled};
use crate::checks::{collect_anchors, PageDocument};
use crate::findings::AuditReport;
use crate::url::parse_target_url;
use crate::AuditError;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Maximum number of pages audited per batch or crawl
pub const MAX_PAGES: usize = 12;

/// Receives human-readable progress messages
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// A progress callback that discards every message
pub fn silent_progress() -> ProgressCallback {
    Arc::new(|_: &str| {})
}

/// Builds the crawl frontier from the homepage markup
///
/// The homepage comes first, followed by same-host links in document order.
/// Entries are unique by exact URL string and capped at [`MAX_PAGES`].
pub fn discover_pages(markup: &str, homepage: &Url) -> Vec<String> {
    let document = PageDocument::parse(markup, homepage.clone());

    let mut seen = HashSet::new();
    let mut frontier = Vec::with_capacity(MAX_PAGES);
    seen.insert(homepage.to_string());
    frontier.push(homepage.to_string());

    for anchor in collect_anchors(&document) {
        if frontier.len() >= MAX_PAGES {
            break;
        }
        if anchor.is_internal && seen.insert(anchor.href.clone()) {
            frontier.push(anchor.href);
        }
    }

    frontier
}

impl Auditor {
    /// Audits up to [`MAX_PAGES`] URLs concurrently
    ///
    /// A progress message is emitted as each page is dispatched. Pages that
    /// fail to fetch yield degraded reports; cancellation aborts the batch.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<AuditReport>)` - One report per audited URL, in input order
    /// * `Err(AuditError::Cancelled)` - The token fired before the batch finished
    pub async fn audit_many(
        &self,
        urls: &[String],
        on_progress: &ProgressCallback,
        cancel: &CancelToken,
    ) -> Result<Vec<AuditReport>, AuditError> {
        if urls.len() > MAX_PAGES {
            tracing::info!(
                "Batch of {} URLs truncated to the first {}",
                urls.len(),
                MAX_PAGES
            );
        }

        let pages = &urls[..urls.len().min(MAX_PAGES)];
        let total = pages.len();
        tracing::info!("Auditing {} pages", total);

        let audits = pages.iter().enumerate().map(|(index, url)| async move {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }
            on_progress(&format!("Auditing page {} of {}: {}", index + 1, total, url));
            self.audit(url, cancel).await
        });

        let reports = try_join_all(audits)
            .await
            .map_err(|Cancelled| AuditError::Cancelled)?;

        tracing::info!(
            "Batch complete: {} pages, {} degraded",
            reports.len(),
            reports.iter().filter(|r| r.is_degraded()).count()
        );
        Ok(reports)
    }

    /// Audits a homepage and the same-host pages it links to
    ///
    /// Only the homepage is fetched for discovery; link discovery does not
    /// recurse. Failure to fetch the homepage is returned as an error.
    pub async fn crawl_and_audit(
        &self,
        start_url: &str,
        on_progress: &ProgressCallback,
        cancel: &CancelToken,
    ) -> Result<Vec<AuditReport>, AuditError> {
        cancel.check()?;
        let start = parse_target_url(start_url)?;

        on_progress(&format!("Discovering pages linked from {}", start));
        let response = self.relay().fetch_with_metadata(start.as_str(), cancel).await?;

        if response.http_status == 0 || response.http_status >= 400 {
            return Err(AuditError::FetchFailed {
                url: start.to_string(),
                reason: format!("homepage returned HTTP {}", response.http_status),
            });
        }
        if response.content.trim().is_empty() {
            return Err(AuditError::FetchFailed {
                url: start.to_string(),
                reason: "homepage returned an empty body".to_string(),
            });
        }

        let homepage = Url::parse(&response.final_url).unwrap_or(start);
        let frontier = discover_pages(&response.content, &homepage);
        tracing::info!(
            "Discovered {} pages on {}",
            frontier.len(),
            homepage.host_str().unwrap_or_default()
        );

        self.audit_many(&frontier, on_progress, cancel).await
    }
}
