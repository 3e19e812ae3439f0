//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Building chapter URLs from the endpoint and query parameters
//! - Charset-aware body decoding
//! - Error classification

use crate::config::CrawlerOptions;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Connect phase limit, independent of the whole-request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `options` - Crawler options supplying the user agent and timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use bible_harvest::config::CrawlerOptions;
/// use bible_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &CrawlerOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(options.timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the page URL for one chapter
///
/// Produces `{base}?version={version}&book={book}&chap={chapter}`, keeping
/// any query parameters already present on the base URL.
pub fn chapter_url(
    base_url: &str,
    version_code: &str,
    book_code: &str,
    chapter: u32,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut()
        .append_pair("version", version_code)
        .append_pair("book", book_code)
        .append_pair("chap", &chapter.to_string());
    Ok(url)
}

/// Fetches one chapter page and decodes its body
///
/// The body is decoded with the charset named in `Content-Type`, falling
/// back to UTF-8.
///
/// # Returns
///
/// * `Ok(String)` - Decoded page body
/// * `Err(HarvestError::HttpStatus)` - Non-2xx response
/// * `Err(HarvestError::Timeout)` - The request exceeded the client timeout
/// * `Err(HarvestError::Http)` - Any other transport or decoding failure
/// * `Err(HarvestError::Cancelled)` - The token fired while the request was in flight
pub async fn fetch_chapter(
    client: &Client,
    url: &Url,
    cancel: &CancellationToken,
) -> Result<String, HarvestError> {
    let request = async {
        debug!("GET {}", url);

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HarvestError::Cancelled),
        result = request => result,
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else {
        HarvestError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
