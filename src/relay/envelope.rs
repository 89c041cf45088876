//! Wire types returned by the relays

use serde::Deserialize;

/// JSON envelope returned by the primary relay
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Page body; `null` when the relay could not fetch the target
    #[serde(default, alias = "contents")]
    pub content: Option<String>,

    #[serde(default)]
    pub status: Option<EnvelopeStatus>,
}

/// Origin metadata reported by the primary relay
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeStatus {
    /// Resolved URL after redirects
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP status returned by the origin
    #[serde(default, rename = "httpCode", alias = "http_code")]
    pub http_code: Option<u16>,
}

/// Error body the secondary relay may return in place of page content
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: serde_json::Value,
}

impl ErrorEnvelope {
    /// Detects an error envelope at the start of a raw relay body
    pub fn detect(body: &str) -> Option<Self> {
        let trimmed = body.trim_start();
        if !trimmed.starts_with('{') {
            return None;
        }
        serde_json::Deserializer::from_str(trimmed)
            .into_iter::<Self>()
            .next()?
            .ok()
    }

    /// Human-readable error message
    pub fn message(&self) -> String {
        match &self.error {
            serde_json::Value::String(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
