//! Sitebinder main entry point
//!
//! Command-line interface: parses and validates options, configures
//! logging, and runs the traverse-then-assemble pipeline.

use clap::{Parser, ValueEnum};
use sitebinder::config::{Config, NavigationMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate a PDF by scraping content from a series of linked web pages
#[derive(Parser, Debug)]
#[command(name = "sitebinder")]
#[command(version)]
#[command(about = "Bind a series of linked web pages into a single PDF", long_about = None)]
struct Cli {
    /// URL of the start page (table of contents, or first page of the series)
    #[arg(long)]
    url: String,

    /// Class of the content region to include in the PDF
    #[arg(long = "content_class")]
    content_class: String,

    /// Name of the output PDF file
    #[arg(long)]
    filename: PathBuf,

    /// Id of the element containing links to the content pages
    /// (mutually exclusive with --next_page_class)
    #[arg(long = "index_id")]
    index_id: Option<String>,

    /// Class of the "next page" link to follow from page to page
    /// (mutually exclusive with --index_id)
    #[arg(long = "next_page_class")]
    next_page_class: Option<String>,

    /// Set the logging level
    #[arg(long = "log-level", value_enum, default_value = "INFO", ignore_case = true)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "UPPER")]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    // Mode selection and all other validation happen before any network
    // activity; a bad configuration never sends a request.
    let mode = NavigationMode::from_options(cli.index_id, cli.next_page_class)?;
    let config = Config::new(&cli.url, cli.content_class, cli.filename, mode)?;

    tracing::info!("Starting traversal from {}", config.start_url);

    match sitebinder::run(&config).await {
        Ok(()) => {
            tracing::info!("Successfully generated {}", config.output_path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the tracing subscriber from the --log-level option
fn setup_logging(level: LogLevel) {
    let filter = match level {
        LogLevel::Debug => EnvFilter::new("sitebinder=debug,info"),
        LogLevel::Info => EnvFilter::new("sitebinder=info,warn"),
        LogLevel::Warning => EnvFilter::new("warn"),
        LogLevel::Error | LogLevel::Critical => EnvFilter::new("error"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
