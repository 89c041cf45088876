//! Single-page auditor
//!
//! Fetches one page through the relay with bounded retry, runs the check
//! battery and scores the result. Every failure other than cancellation is
//! folded into a degraded report so one bad page never aborts a batch.

use crate::cancel::{CancelToken, Cancelled};
use crate::checks::{order_findings, run_all, PageDocument};
use crate::config::{Config, RetryConfig};
use crate::findings::AuditReport;
use crate::relay::{RelayClient, RelayError, RelayResponse};
use crate::scoring::compute_scores;
use crate::url::parse_target_url;
use crate::AuditError;
use std::time::Duration;
use url::Url;

/// Audits pages through a content relay
#[derive(Debug, Clone)]
pub struct Auditor {
    relay: RelayClient,
    retry: RetryConfig,
}

impl Auditor {
    /// Creates an auditor with a relay client built from `config`
    pub fn new(config: &Config) -> Result<Self, AuditError> {
        let relay = RelayClient::new(config)?;
        Ok(Self::with_relay(relay, config.retry.clone()))
    }

    /// Creates an auditor around an existing relay client
    pub fn with_relay(relay: RelayClient, retry: RetryConfig) -> Self {
        Self { relay, retry }
    }

    pub fn relay(&self) -> &RelayClient {
        &self.relay
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Audits a single page
    ///
    /// The report's `id` is `url` exactly as supplied. The relay is asked for
    /// the normalized form (a bare host gets `https://`).
    ///
    /// # Returns
    ///
    /// * `Ok(AuditReport)` - A full report, or a degraded one if the page
    ///   could not be fetched
    /// * `Err(Cancelled)` - The token fired; no report is produced
    pub async fn audit(&self, url: &str, cancel: &CancelToken) -> Result<AuditReport, Cancelled> {
        cancel.check()?;
        let target = parse_target_url(url)
            .map(|parsed| parsed.to_string())
            .unwrap_or_else(|_| url.to_string());
        tracing::debug!("Auditing {}", target);

        let response = match self.fetch_with_retry(&target, cancel).await {
            Ok(response) => response,
            Err(RelayError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                tracing::warn!("Could not fetch {}: {}", target, e);
                return Ok(AuditReport::degraded(
                    url,
                    &target,
                    format!(
                        "The target was unreachable or blocked the request; the content relay could not retrieve it ({}).",
                        e
                    ),
                ));
            }
        };

        if let Some(reason) = unusable_response(&response) {
            tracing::info!("Page {} not audited: {}", target, reason);
            return Ok(AuditReport::degraded(url, &response.final_url, reason));
        }

        Ok(build_report(url, &response.final_url, &response.content))
    }

    /// Fetches `url` with a fixed delay between attempts
    async fn fetch_with_retry(&self, url: &str, cancel: &CancelToken) -> Result<RelayResponse, RelayError> {
        let attempts = self.retry.page_attempts.max(1);
        let delay = Duration::from_millis(self.retry.page_delay_ms);
        let mut attempt = 1;

        loop {
            match self.relay.fetch_with_metadata(url, cancel).await {
                Ok(response) => return Ok(response),
                Err(RelayError::Cancelled) => return Err(RelayError::Cancelled),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        attempts,
                        url,
                        e,
                        delay
                    );
                    cancel.sleep(delay).await?;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Explains why a relay response cannot be audited, if it cannot
fn unusable_response(response: &RelayResponse) -> Option<String> {
    match response.http_status {
        0 => Some(format!(
            "The target {} was unreachable or blocked the request (no HTTP status received).",
            response.final_url
        )),
        status if status >= 400 => Some(format!(
            "The target {} returned an error status: HTTP {}.",
            response.final_url, status
        )),
        _ if response.content.trim().is_empty() => Some(format!(
            "The target {} returned an empty page (HTTP {}).",
            response.final_url, response.http_status
        )),
        _ => None,
    }
}

/// Audits already-fetched markup
///
/// `id` is the URL as requested and `final_url` the resolved one; relative
/// references in `markup` resolve against `final_url`.
pub fn build_report(id: &str, final_url: &str, markup: &str) -> AuditReport {
    let base = match Url::parse(final_url).or_else(|_| parse_target_url(id).map_err(|_| ())) {
        Ok(base) => base,
        Err(_) => {
            return AuditReport::degraded(
                id,
                final_url,
                format!("The resolved URL '{}' is not a valid address.", final_url),
            );
        }
    };

    let document = PageDocument::parse(markup, base);
    let findings = order_findings(run_all(&document));
    let (seo_score, geo_score) = compute_scores(&findings);

    AuditReport {
        id: id.to_string(),
        url: final_url.to_string(),
        findings,
        seo_score,
        geo_score,
    }
}
