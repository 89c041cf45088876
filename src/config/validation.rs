use crate::config::types::{Config, RelayConfig, RetryConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_relay_config(&config.relay)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

/// Validates relay endpoints and timeouts
fn validate_relay_config(config: &RelayConfig) -> Result<(), ConfigError> {
    validate_endpoint("primary", &config.primary)?;
    validate_endpoint("secondary", &config.secondary)?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates a relay endpoint: absolute HTTP(S) URL
fn validate_endpoint(name: &str, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} relay '{}': {}", name, endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} relay '{}' must use HTTP or HTTPS",
            name, endpoint
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry policy
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.page_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "page-attempts must be >= 1, got {}",
            config.page_attempts
        )));
    }

    if config.sitemap_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "sitemap-attempts must be >= 1, got {}",
            config.sitemap_attempts
        )));
    }

    Ok(())
}
