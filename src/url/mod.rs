//! URL handling module for Geo-Audit
//!
//! This module provides hostname extraction, operator input validation, and
//! href resolution against a document base URL.

mod domain;
mod resolve;

pub use domain::{extract_domain, is_same_host};
pub use resolve::{is_skipped_href, parse_target_url, resolve_href};
