use serde::Deserialize;

/// Main configuration structure for Geo-Audit
///
/// Every section is optional; missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Content relay endpoints and transport limits
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Endpoint answering with a JSON envelope; target passed as `?url=`
    #[serde(default = "default_primary")]
    pub primary: String,

    /// Fallback endpoint answering with raw text; target passed as `?url=`
    #[serde(default = "default_secondary")]
    pub secondary: String,

    /// Overall request timeout (seconds)
    #[serde(default = "default_timeout", rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(default = "default_connect_timeout", rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

/// User agent identification sent to the relays
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,
}

/// Retry and backoff policy
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Fetch attempts per audited page
    #[serde(default = "default_page_attempts", rename = "page-attempts")]
    pub page_attempts: u32,

    /// Fixed delay between page attempts (milliseconds)
    #[serde(default = "default_page_delay", rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Fetch attempts per sitemap
    #[serde(default = "default_sitemap_attempts", rename = "sitemap-attempts")]
    pub sitemap_attempts: u32,

    /// Backoff unit between sitemap attempts, multiplied by the attempt number (milliseconds)
    #[serde(default = "default_sitemap_backoff", rename = "sitemap-backoff-ms")]
    pub sitemap_backoff_ms: u64,
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_primary() -> String {
    "https://api.allorigins.win/get".to_string()
}

fn default_secondary() -> String {
    "https://api.codetabs.com/v1/proxy".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_agent_name() -> String {
    "GeoAudit".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_page_attempts() -> u32 {
    2
}

fn default_page_delay() -> u64 {
    500
}

fn default_sitemap_attempts() -> u32 {
    3
}

fn default_sitemap_backoff() -> u64 {
    1000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            page_attempts: default_page_attempts(),
            page_delay_ms: default_page_delay(),
            sitemap_attempts: default_sitemap_attempts(),
            sitemap_backoff_ms: default_sitemap_backoff(),
        }
    }
}
