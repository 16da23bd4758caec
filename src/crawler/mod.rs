//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with an explicit success/failure result
//! - HTML parsing and in-scope link extraction
//! - The frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{
    build_header_map, build_http_client, fetch_url, FetchFailure, FetchResult, Fetcher,
};
pub use frontier::Frontier;
pub use parser::{extract_links, ExtractedLinks};

use crate::config::Config;
use crate::SitemapError;
use std::future::Future;

/// Runs a complete crawl operation
///
/// This is the main entry point for building a sitemap. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Seed the frontier with the homepage
/// 3. Fetch pages and follow in-scope links until the frontier is empty
/// 4. Write the sitemap and return it with the crawl statistics
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Sitemap written
/// * `Err(SitemapError)` - Invalid configuration or the sitemap could not be written
pub async fn crawl(config: Config) -> Result<CrawlReport, SitemapError> {
    run_crawl(config).await
}

/// Like [`crawl`], but stops early when `shutdown` completes
///
/// The records gathered before the shutdown are still written.
pub async fn crawl_until<F>(config: Config, shutdown: F) -> Result<CrawlReport, SitemapError>
where
    F: Future<Output = ()>,
{
    Coordinator::new(config)?.run_until(shutdown).await
}
