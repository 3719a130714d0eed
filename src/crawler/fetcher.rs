//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (user agent, timeouts, TLS policy)
//! - GET requests returning the page body
//! - Error classification into transient network faults and page faults
//!
//! Failed fetches are never retried.

use crate::config::Config;
use crate::ScrapeError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Source of page bodies
///
/// The coordinator is generic over this trait so the crawl can run against
/// an in-memory site in tests.
pub trait PageFetcher: Send + Sync {
    /// Fetches one page and returns its body text
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// Certificate validation stays on unless `site.accept-invalid-certs` is set.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    if config.site.accept_invalid_certs {
        tracing::warn!("TLS certificate validation is disabled (site.accept-invalid-certs = true)");
    }

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .danger_accept_invalid_certs(config.site.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the body text
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout (connect or whole request) | `Timeout` |
/// | Connection refused / reset, body cut short | `Connection` |
/// | Non-2xx status | `Status` |
/// | Anything else (redirect loop, undecodable body) | `Http` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, ScrapeError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

fn classify_error(url: &Url, error: reqwest::Error) -> ScrapeError {
    let url = url.to_string();

    if error.is_timeout() {
        ScrapeError::Timeout { url }
    } else if error.is_connect() || error.is_request() || error.is_body() {
        ScrapeError::Connection { url, source: error }
    } else {
        ScrapeError::Http { url, source: error }
    }
}

/// [`PageFetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        tracing::trace!("GET {}", url);
        fetch_page(&self.client, url).await
    }
}
