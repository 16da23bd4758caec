//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured request headers
//! - GET requests to fetch page content
//! - Classifying failures into an explicit result variant
//!
//! There are no retries: a failed fetch marks the URL unreachable for the rest
//! of the crawl.

use crate::config::Config;
use crate::{ConfigError, SitemapError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Upper bound on the TCP connect phase
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reason a fetch did not produce a usable page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Server answered with something other than 200
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    Timeout,
    /// Connection, TLS, redirect or body read error
    Network(String),
    /// 200 response with an empty body
    EmptyBody,
    /// Body was fetched but could not be parsed
    Parse(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "request timeout"),
            Self::Network(error) => write!(f, "network error: {}", error),
            Self::EmptyBody => write!(f, "empty response body"),
            Self::Parse(error) => write!(f, "unparseable page: {}", error),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The page could not be fetched
    Failure(FetchFailure),
}

/// Converts configured headers into a `HeaderMap`
///
/// # Errors
///
/// Returns `ConfigError::InvalidHeader` if a name or value is not legal HTTP.
pub fn build_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("invalid header name '{}'", name)))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ConfigError::InvalidHeader(format!("invalid value for header '{}'", name))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Builds an HTTP client with proper configuration
///
/// The client sends the configured headers on every request, always including
/// a `User-Agent` (see [`Config::request_headers`]).
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::Config;
/// use sumi_sitemap::crawler::build_http_client;
///
/// let config = Config::for_homepage("https://example.com");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, SitemapError> {
    let headers = build_header_map(&config.request_headers())?;
    let timeout = config.crawler.request_timeout();

    let client = Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200, non-empty body | `Success` |
/// | HTTP 200, empty body | `Failure(EmptyBody)` |
/// | Any other status | `Failure(HttpStatus)` |
/// | Timeout | `Failure(Timeout)` |
/// | Connection/TLS/redirect error | `Failure(Network)` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return FetchResult::Failure(classify_error(&e)),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if status != StatusCode::OK {
        return FetchResult::Failure(FetchFailure::HttpStatus(status.as_u16()));
    }

    match response.text().await {
        Ok(body) if body.trim().is_empty() => FetchResult::Failure(FetchFailure::EmptyBody),
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::Failure(classify_error(&e)),
    }
}

fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Network("connection refused".to_string())
    } else {
        FetchFailure::Network(error.to_string())
    }
}

/// Cloneable handle used by crawl workers
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher from the crawl configuration
    pub fn new(config: &Config) -> Result<Self, SitemapError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}
