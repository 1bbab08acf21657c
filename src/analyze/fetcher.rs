//! Page fetching
//!
//! One outbound GET per check: redirects followed, bounded by a fixed
//! timeout, no retries and no caching. Any transport failure or a final
//! status >= 400 fails the check before anything is written.

use thiserror::Error;

use crate::config::FetchConfig;

/// Errors that can occur during fetching
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: timeout, connect, DNS, redirect loop, decode
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered, but with an error status
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final HTTP status code after redirects
    pub status_code: u16,
    /// Decoded response body
    pub body: String,
}

/// Single-request page fetcher
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Create a new fetcher with one shared HTTP client
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a stored host URL, returning the final status and body text.
    pub async fn fetch(&self, host_url: &str) -> Result<FetchedPage, FetchError> {
        let target = Self::with_scheme(host_url);

        let response = self.client.get(&target).send().await?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;

        Ok(FetchedPage {
            status_code: status,
            body,
        })
    }

    /// Prepend `http://` when a stored host string lacks a scheme.
    ///
    /// Stored hosts always carry a scheme today; this guards against legacy
    /// rows written before normalization enforced one.
    fn with_scheme(host_url: &str) -> String {
        if host_url.contains("://") {
            host_url.to_string()
        } else {
            format!("http://{}", host_url)
        }
    }
}
