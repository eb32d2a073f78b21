//! HTTP fetcher implementation
//!
//! One outbound GET per page, strictly sequential, no retries. A failed
//! fetch is fatal for the whole run: a broken link mid-series should stop
//! the run rather than silently skip content.

use crate::{BinderError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A fetched page: the final URL after redirects plus the raw response body.
///
/// The final URL (not the requested one) is the base for resolving relative
/// links found on the page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub body: String,
}

/// Builds the HTTP client used for the whole run
///
/// Redirects are followed by the client; the per-request timeout is the only
/// timeout in the system.
pub fn build_http_client() -> Result<Client> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a single page
///
/// # Errors
///
/// * Non-2xx response → [`BinderError::Status`]
/// * Request timeout → [`BinderError::Timeout`]
/// * Any other transport failure (DNS, connection, TLS) → [`BinderError::Http`]
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BinderError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|e| classify(url, e))?;

    tracing::debug!("Fetched {} ({} bytes)", url, body.len());
    Ok(FetchedPage {
        url: final_url,
        body,
    })
}

fn classify(url: &Url, source: reqwest::Error) -> BinderError {
    if source.is_timeout() {
        BinderError::Timeout {
            url: url.to_string(),
        }
    } else {
        BinderError::Http {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    // Fetch behavior against live servers is covered by the wiremock
    // integration tests in tests/.
}
