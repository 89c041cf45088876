//! Geo-Audit main entry point
//!
//! This is the command-line interface for the Geo-Audit page audit engine.

use anyhow::Context;
use clap::{Parser, Subcommand};
use geo_audit::audit::ProgressCallback;
use geo_audit::config::{load_or_default, OutputFormat};
use geo_audit::narrative::{NarrativeContext, NarrativeGenerator, SummaryNarrator};
use geo_audit::output::{render_reports, write_output};
use geo_audit::{AuditError, AuditOutcome, AuditReport, AuditRequest, Auditor, CancelToken};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Geo-Audit: on-page SEO and GEO audits
///
/// Geo-Audit fetches pages through a content relay, runs a fixed battery of
/// checks, and scores each page for classic search engines and generative
/// answer engines.
#[derive(Parser, Debug)]
#[command(name = "geo-audit")]
#[command(version)]
#[command(about = "On-page SEO and GEO audit engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print a plain-text summary of the issues after the report
    #[arg(long)]
    narrate: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Audit a single page
    Single {
        /// Page URL
        url: String,
    },

    /// Audit a list of pages (at most 12)
    Custom {
        /// Page URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Audit a homepage and the same-site pages it links to
    Crawl {
        /// Homepage URL
        url: String,
    },

    /// Audit pages listed in a sitemap
    Sitemap {
        /// Sitemap URL
        url: String,

        /// Entry numbers to audit, 1-based (defaults to the first 12)
        #[arg(short, long, value_delimiter = ',')]
        pages: Vec<usize>,
    },
}

impl Mode {
    fn into_request(self) -> AuditRequest {
        match self {
            Mode::Single { url } => AuditRequest::Single(url),
            Mode::Custom { urls } => AuditRequest::Custom(urls),
            Mode::Crawl { url } => AuditRequest::Crawl(url),
            Mode::Sitemap { url, pages } => AuditRequest::Sitemap {
                sitemap_url: url,
                selection: pages,
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            if e.downcast_ref::<AuditError>().is_some_and(AuditError::is_cancelled) {
                eprintln!("Audit terminated by user");
                return ExitCode::from(130);
            }
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("geo_audit=info,warn"),
            1 => EnvFilter::new("geo_audit=debug,info"),
            2 => EnvFilter::new("geo_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Fires the token on the first Ctrl-C
fn cancel_on_interrupt() -> CancelToken {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping audit");
            token.cancel();
        }
    });
    cancel
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    let format = cli.format.unwrap_or(config.output.format);
    let auditor = Auditor::new(&config)?;
    let cancel = cancel_on_interrupt();
    let progress: ProgressCallback = Arc::new(|message: &str| tracing::info!("{}", message));

    let request = cli.mode.into_request();
    let outcome = auditor.run_request(&request, &progress, &cancel).await?;

    match outcome {
        AuditOutcome::Completed(reports) => {
            tracing::info!("Audit completed: {} page(s)", reports.len());
            let rendered = render_reports(&reports, format)?;
            write_output(&rendered, cli.output.as_deref())?;
            if cli.narrate {
                print_narrative(&reports)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        AuditOutcome::NothingProcessed => {
            eprintln!("No pages were processed.");
            Ok(ExitCode::FAILURE)
        }
        AuditOutcome::SitemapIndex(children) => {
            println!("The sitemap is an index of {} sitemaps:", children.len());
            for (index, child) in children.iter().enumerate() {
                println!("  {}. {}", index + 1, child);
            }
            println!("\nRun `geo-audit sitemap <URL>` with one of them to audit its pages.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_narrative(reports: &[AuditReport]) -> anyhow::Result<()> {
    let context = NarrativeContext::for_batch(reports, &[]);
    let summary = SummaryNarrator.generate(&context)?;
    eprintln!("\n{}", summary);
    Ok(())
}
