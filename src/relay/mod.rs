//! Content relay client
//!
//! Third-party pages are fetched through network relays rather than directly.
//! This module contains:
//! - The dual-endpoint client with primary/secondary fallback
//! - Wire types for the relay responses
//! - Relay error classification

mod client;
mod envelope;

pub use client::{build_http_client, RelayClient, RelayResponse, RelaySource};
pub use envelope::{Envelope, EnvelopeStatus, ErrorEnvelope};

use crate::cancel::Cancelled;
use thiserror::Error;

/// Errors raised while fetching through the relays
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("relay returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("relay returned no content for {url}")]
    EmptyPayload { url: String },

    #[error("relay reported an error for {url}: {message}")]
    Reported { url: String, message: String },

    #[error("malformed relay envelope for {url}: {source}")]
    Envelope {
        url: String,
        source: serde_json::Error,
    },

    #[error("all relays failed for {url}: {last}")]
    Unavailable {
        url: String,
        #[source]
        last: Box<RelayError>,
    },

    #[error("invalid relay endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("relay request cancelled")]
    Cancelled,
}

impl RelayError {
    /// Returns true if the fetch stopped because the cancel token fired
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<Cancelled> for RelayError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
