//! Crawler module for page fetching, extraction, and traversal
//!
//! This module contains the traversal core:
//! - HTTP fetching
//! - Content and link extraction from parsed markup
//! - Inline style sanitization for the PDF renderer
//! - The traversal engine driving both navigation strategies

mod engine;
mod extractor;
mod fetcher;
mod sanitizer;

pub use engine::{traverse, TraversalState};
pub use extractor::{collect_links, extract_first, find_next_url, SelectorKind};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use sanitizer::{absolutize_urls, sanitize};
