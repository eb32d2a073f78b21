//! Traversal engine - drives page-to-page navigation
//!
//! The engine owns all mutable traversal state and runs one of two
//! interchangeable navigation strategies behind a single sequential driver
//! loop:
//!
//! - **Index-based**: the frontier is the ordered, deduplicated list of
//!   links found inside the start page's container element, fixed up front.
//! - **Next-link**: each page names its successor via a "next" element;
//!   traversal ends when the element disappears or points back to a page
//!   already visited (the cycle guard).
//!
//! In both modes a missing content region or a failed fetch aborts the
//! whole run; a missing next link is the normal end of the series.

use crate::config::{Config, NavigationMode};
use crate::crawler::extractor::{collect_links, extract_first, find_next_url, SelectorKind};
use crate::crawler::fetcher::{fetch_page, FetchedPage};
use crate::crawler::sanitizer::{absolutize_urls, sanitize};
use crate::{BinderError, Result};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Mutable state owned by the traversal engine
///
/// The visited set never shrinks, and no URL is fetched twice within one
/// run. Fragment order is discovery order, which determines PDF page order.
#[derive(Debug, Default)]
pub struct TraversalState {
    visited: HashSet<Url>,
    fragments: Vec<String>,
}

impl TraversalState {
    fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.clone())
    }

    fn push_fragment(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    pub fn visited(&self) -> &HashSet<Url> {
        &self.visited
    }

    fn into_fragments(self) -> Vec<String> {
        self.fragments
    }
}

/// A navigation strategy: yields the next URL to visit, one at a time.
///
/// `last` is the page that was just processed (None before the first
/// visit); `visited` is consulted so no strategy can revisit a page.
trait Navigator: Send {
    fn advance(&mut self, last: Option<&FetchedPage>, visited: &HashSet<Url>) -> Option<Url>;
}

/// Index-based strategy: walks a frontier that was fixed up front.
struct IndexNavigator {
    frontier: VecDeque<Url>,
}

impl Navigator for IndexNavigator {
    fn advance(&mut self, _last: Option<&FetchedPage>, visited: &HashSet<Url>) -> Option<Url> {
        while let Some(url) = self.frontier.pop_front() {
            if visited.contains(&url) {
                tracing::debug!("Already visited {}", url);
                continue;
            }
            return Some(url);
        }
        None
    }
}

/// Next-link strategy: each page names its successor.
struct NextLinkNavigator {
    next_class: String,
    start: Option<Url>,
}

impl Navigator for NextLinkNavigator {
    fn advance(&mut self, last: Option<&FetchedPage>, visited: &HashSet<Url>) -> Option<Url> {
        if let Some(start) = self.start.take() {
            return Some(start);
        }

        // The next link lives in navigation chrome outside the content
        // region, so it is looked up in the raw page markup.
        let page = last?;
        let Some(next) = find_next_url(&page.body, &self.next_class, &page.url) else {
            tracing::info!("No next link on {}, end of series", page.url);
            return None;
        };

        if visited.contains(&next) {
            tracing::info!(
                "Next link on {} points back to visited {}, stopping",
                page.url,
                next
            );
            return None;
        }

        Some(next)
    }
}

/// Runs the traversal and returns the sanitized fragments in page order.
///
/// This is the whole sequential pipeline: for every page the engine fetches,
/// extracts the content region by class, rewrites relative URLs, sanitizes
/// percentage sizing, and appends the result. Any fetch failure or missing
/// content region aborts the run with an error naming the offending URL.
pub async fn traverse(client: &Client, config: &Config) -> Result<Vec<String>> {
    let mut state = TraversalState::default();

    let mut navigator: Box<dyn Navigator> = match &config.mode {
        NavigationMode::IndexBased { container_id } => {
            let frontier = discover_frontier(client, config, container_id, &mut state).await?;
            Box::new(IndexNavigator { frontier })
        }
        NavigationMode::NextLink { next_class } => Box::new(NextLinkNavigator {
            next_class: next_class.clone(),
            start: Some(config.start_url.clone()),
        }),
    };

    let mut last: Option<FetchedPage> = None;
    while let Some(url) = navigator.advance(last.as_ref(), state.visited()) {
        state.mark_visited(&url);
        tracing::info!("Processing {}", url);

        let page = fetch_page(client, &url).await?;
        // The post-redirect URL counts as visited too, so a later next link
        // pointing at a redirect target still trips the cycle guard.
        if page.url != url {
            state.mark_visited(&page.url);
        }

        let fragment = extract_first(&page.body, SelectorKind::Class, &config.content_class)
            .ok_or_else(|| BinderError::ContentNotFound {
                url: url.to_string(),
                selector: config.content_class.clone(),
            })?;

        let fragment = sanitize(&absolutize_urls(&fragment, &page.url));
        state.push_fragment(fragment);
        last = Some(page);
    }

    if state.fragments.is_empty() {
        tracing::warn!("Traversal produced no content fragments");
    }

    Ok(state.into_fragments())
}

/// Fetches the index page and builds the fixed frontier from its container.
///
/// The index page's own content is not collected; only the pages it links
/// to end up in the PDF. A missing container element is a fatal
/// misconfiguration.
async fn discover_frontier(
    client: &Client,
    config: &Config,
    container_id: &str,
    state: &mut TraversalState,
) -> Result<VecDeque<Url>> {
    tracing::info!("Discovering content pages from {}", config.start_url);

    let page = fetch_page(client, &config.start_url).await?;
    state.mark_visited(&config.start_url);
    if page.url != config.start_url {
        state.mark_visited(&page.url);
    }

    let links = collect_links(&page.body, container_id, &page.url).ok_or_else(|| {
        BinderError::ContentNotFound {
            url: page.url.to_string(),
            selector: container_id.to_string(),
        }
    })?;

    tracing::info!("Found {} content pages in index", links.len());
    Ok(links.into_iter().collect())
}
