//! Sitebinder: bind a series of linked web pages into a single PDF
//!
//! This crate crawls a small set of linked HTML pages, extracts a designated
//! content region from each, and assembles the extracted fragments into one
//! paginated PDF document. Two mutually exclusive navigation strategies are
//! supported: following the links of a table-of-contents container, or
//! chasing a "next page" link from page to page.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for sitebinder operations
///
/// Every variant aborts the run when it surfaces: the tool favors a failed
/// run over a silently incomplete PDF, so there is no retry and no partial
/// recovery.
#[derive(Debug, Error)]
pub enum BinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("No element matching '{selector}' found at {url}")]
    ContentNotFound { url: String, selector: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
///
/// All of these are reported before any network activity occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--index_id and --next_page_class are mutually exclusive; give exactly one")]
    BothModes,

    #[error("one of --index_id or --next_page_class is required")]
    MissingMode,

    #[error("Invalid start URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{0}': {1}")]
    InvalidSelector(String, String),

    #[error("Output filename cannot be empty")]
    EmptyFilename,
}

/// PDF rendering and output errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF rendering failed for fragment {index}: {message}")]
    Fragment { index: usize, message: String },

    #[error("PDF rendering failed: {message}")]
    Document { message: String },

    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type alias for sitebinder operations
pub type Result<T> = std::result::Result<T, BinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, NavigationMode};

/// Runs the full pipeline: traverse the site, then assemble the PDF.
///
/// Either the whole run succeeds and one PDF is written at the configured
/// output path, or the run aborts with an error and no output file is
/// created or left in a partial state.
pub async fn run(config: &Config) -> Result<()> {
    let client = crawler::build_http_client()?;
    let fragments = crawler::traverse(&client, config).await?;
    output::assemble(&fragments, &config.output_path)
}
