//! Audit module: single pages, batches, crawls, and request modes
//!
//! This module contains the core audit flow:
//! - Fetching a page through the relay with bounded retry
//! - Running the check battery and scoring the findings
//! - Auditing batches concurrently with progress and cancellation
//! - Single-level crawl discovery from a homepage
//! - Dispatching the four request modes

mod auditor;
mod orchestrator;
mod request;

pub use auditor::{build_report, Auditor};
pub use orchestrator::{discover_pages, silent_progress, ProgressCallback, MAX_PAGES};
pub use request::{AuditOutcome, AuditRequest};
