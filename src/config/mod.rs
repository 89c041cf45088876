//! Configuration module for Geo-Audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so running without a file is allowed.
//!
//! # Example
//!
//! ```no_run
//! use geo_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("geo-audit.toml")).unwrap();
//! println!("Page attempts: {}", config.retry.page_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, OutputFormat, RelayConfig, RetryConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
