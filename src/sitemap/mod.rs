//! Sitemap resolver
//!
//! Fetches a sitemap through the content relay and parses it into either a
//! list of child sitemaps (an index) or a flat list of page URLs. Results are
//! never cached.

mod parser;

pub use parser::parse_sitemap;

use crate::cancel::CancelToken;
use crate::config::RetryConfig;
use crate::relay::RelayClient;
use crate::AuditError;
use serde::Serialize;
use std::time::Duration;

/// Shape of a parsed sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapKind {
    /// A `<sitemapindex>` listing child sitemaps
    Index,
    /// A `<urlset>` listing pages
    Urlset,
}

/// Parsed sitemap: child sitemap URLs for an index, page URLs for a urlset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapParseResult {
    pub kind: SitemapKind,
    pub urls: Vec<String>,
}

/// Fetches and parses sitemaps with linear backoff
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    relay: RelayClient,
    attempts: u32,
    backoff: Duration,
}

impl SitemapResolver {
    pub fn new(relay: RelayClient, retry: &RetryConfig) -> Self {
        Self {
            relay,
            attempts: retry.sitemap_attempts.max(1),
            backoff: Duration::from_millis(retry.sitemap_backoff_ms),
        }
    }

    /// Resolves the sitemap at `url`
    ///
    /// Each attempt fetches through the relay fallback chain and parses the
    /// body. After attempt `n` fails, the resolver waits `n × backoff` before
    /// trying again.
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapParseResult)` - Parsed sitemap
    /// * `Err(AuditError::SitemapExhausted)` - Every attempt failed; wraps the last cause
    /// * `Err(AuditError::Cancelled)` - The token fired
    pub async fn resolve(&self, url: &str, cancel: &CancelToken) -> Result<SitemapParseResult, AuditError> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            cancel.check()?;

            match self.fetch_and_parse(url, cancel).await {
                Ok(parsed) => {
                    tracing::info!(
                        "Resolved sitemap {} ({:?}, {} entries)",
                        url,
                        parsed.kind,
                        parsed.urls.len()
                    );
                    return Ok(parsed);
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Sitemap attempt {}/{} for {} failed: {}",
                        attempt,
                        self.attempts,
                        url,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.attempts {
                cancel.sleep(self.backoff * attempt).await?;
            }
        }

        Err(AuditError::SitemapExhausted {
            attempts: self.attempts,
            source: Box::new(last_error.unwrap_or_else(|| {
                AuditError::ParseFailure(format!("no attempt was made to fetch {}", url))
            })),
        })
    }

    async fn fetch_and_parse(&self, url: &str, cancel: &CancelToken) -> Result<SitemapParseResult, AuditError> {
        let body = self.relay.fetch_raw(url, cancel).await?;
        parse_sitemap(&body)
    }
}
