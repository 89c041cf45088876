//! Dual-endpoint relay client
//!
//! Every fetch tries the primary relay first and falls back to the secondary
//! relay on any failure. There is no retry here; callers own their retry
//! policy.

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::relay::envelope::{Envelope, ErrorEnvelope};
use crate::relay::RelayError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Which relay served a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaySource {
    Primary,
    Secondary,
}

/// Page content plus the origin metadata the relay could provide
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// Page body as delivered by the origin
    pub content: String,
    /// Resolved URL after redirects
    pub final_url: String,
    /// HTTP status reported for the origin
    pub http_status: u16,
    pub source: RelaySource,
}

/// Builds an HTTP client for talking to the relays
///
/// # Example
///
/// ```no_run
/// use geo_audit::config::Config;
/// use geo_audit::relay::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    // Format: Name/Version
    let user_agent = format!("{}/{}", config.user_agent.name, config.user_agent.version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.relay.timeout_secs))
        .connect_timeout(Duration::from_secs(config.relay.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Content relay client
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    primary: Url,
    secondary: Url,
}

impl RelayClient {
    /// Creates a relay client from configuration
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        let client = build_http_client(config).map_err(RelayError::Client)?;
        Self::with_client(client, &config.relay.primary, &config.relay.secondary)
    }

    /// Creates a relay client around an existing HTTP client
    pub fn with_client(client: Client, primary: &str, secondary: &str) -> Result<Self, RelayError> {
        let primary = Url::parse(primary)
            .map_err(|e| RelayError::InvalidEndpoint(format!("{}: {}", primary, e)))?;
        let secondary = Url::parse(secondary)
            .map_err(|e| RelayError::InvalidEndpoint(format!("{}: {}", secondary, e)))?;

        Ok(Self {
            client,
            primary,
            secondary,
        })
    }

    /// Fetches the raw body of `url`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body from whichever relay succeeded
    /// * `Err(RelayError::Unavailable)` - Both relays failed; wraps the last cause
    /// * `Err(RelayError::Cancelled)` - The token fired before a body arrived
    pub async fn fetch_raw(&self, url: &str, cancel: &CancelToken) -> Result<String, RelayError> {
        self.fetch_with_metadata(url, cancel)
            .await
            .map(|response| response.content)
    }

    /// Fetches `url` along with its resolved URL and origin status code
    ///
    /// The secondary relay carries no metadata, so a fallback response reports
    /// the requested URL and the relay's own status.
    pub async fn fetch_with_metadata(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<RelayResponse, RelayError> {
        cancel.check()?;

        match self.fetch_primary(url, cancel).await {
            Ok(response) => return Ok(response),
            Err(RelayError::Cancelled) => return Err(RelayError::Cancelled),
            Err(e) => {
                tracing::warn!("Primary relay failed for {}: {}; trying secondary", url, e);
            }
        }

        match self.fetch_secondary(url, cancel).await {
            Ok(response) => Ok(response),
            Err(RelayError::Cancelled) => Err(RelayError::Cancelled),
            Err(e) => {
                tracing::warn!("Secondary relay failed for {}: {}", url, e);
                Err(RelayError::Unavailable {
                    url: url.to_string(),
                    last: Box::new(e),
                })
            }
        }
    }

    /// Requests `url` through the JSON envelope relay
    async fn fetch_primary(&self, url: &str, cancel: &CancelToken) -> Result<RelayResponse, RelayError> {
        tracing::debug!("Fetching {} via primary relay", url);

        let request = self
            .client
            .get(self.primary.clone())
            .query(&[("url", url)])
            .send();
        let response = cancel
            .run(request)
            .await?
            .map_err(|source| RelayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = cancel
            .run(response.text())
            .await?
            .map_err(|source| RelayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|source| RelayError::Envelope {
                url: url.to_string(),
                source,
            })?;

        let content = envelope.content.ok_or_else(|| RelayError::EmptyPayload {
            url: url.to_string(),
        })?;

        let (final_url, http_status) = match envelope.status {
            Some(meta) => (
                meta.url.unwrap_or_else(|| url.to_string()),
                meta.http_code.unwrap_or(200),
            ),
            None => (url.to_string(), 200),
        };

        Ok(RelayResponse {
            content,
            final_url,
            http_status,
            source: RelaySource::Primary,
        })
    }

    /// Requests `url` through the raw text relay
    async fn fetch_secondary(&self, url: &str, cancel: &CancelToken) -> Result<RelayResponse, RelayError> {
        tracing::debug!("Fetching {} via secondary relay", url);

        let request = self
            .client
            .get(self.secondary.clone())
            .query(&[("url", url)])
            .send();
        let response = cancel
            .run(request)
            .await?
            .map_err(|source| RelayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = cancel
            .run(response.text())
            .await?
            .map_err(|source| RelayError::Transport {
                url: url.to_string(),
                source,
            })?;

        if let Some(error) = ErrorEnvelope::detect(&body) {
            return Err(RelayError::Reported {
                url: url.to_string(),
                message: error.message(),
            });
        }

        Ok(RelayResponse {
            content: body,
            final_url: url.to_string(),
            http_status: status.as_u16(),
            source: RelaySource::Secondary,
        })
    }
}
