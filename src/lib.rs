//! Geo-Audit: an on-page SEO and GEO audit engine
//!
//! This crate fetches pages through a content relay, runs a fixed battery of
//! checks against the parsed markup, and scores the findings for classic search
//! (SEO) and generative answer engines (GEO). Multi-page crawls and sitemaps are
//! orchestrated with retry, fallback, cancellation, and progress reporting.

pub mod audit;
pub mod cancel;
pub mod checks;
pub mod config;
pub mod findings;
pub mod narrative;
pub mod output;
pub mod relay;
pub mod scoring;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Content relay unavailable: {0}")]
    RelayUnavailable(#[source] relay::RelayError),

    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Audit terminated by user")]
    Cancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Sitemap could not be resolved after {attempts} attempts: {source}")]
    SitemapExhausted {
        attempts: u32,
        #[source]
        source: Box<AuditError>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuditError {
    /// Returns true if this error was caused by the operator cancelling the run
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Relay setup errors are configuration problems, not an unavailable relay
impl From<relay::RelayError> for AuditError {
    fn from(err: relay::RelayError) -> Self {
        match err {
            relay::RelayError::Cancelled => Self::Cancelled,
            relay::RelayError::InvalidEndpoint(endpoint) => {
                Self::Config(ConfigError::InvalidUrl(endpoint))
            }
            relay::RelayError::Client(e) => Self::Http(e),
            other => Self::RelayUnavailable(other),
        }
    }
}

impl From<cancel::Cancelled> for AuditError {
    fn from(_: cancel::Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{AuditOutcome, AuditRequest, Auditor};
pub use cancel::{CancelToken, Cancelled};
pub use config::Config;
pub use findings::{AuditReport, CheckName, CheckStatus, Finding, FindingData};
pub use sitemap::{SitemapKind, SitemapParseResult};
