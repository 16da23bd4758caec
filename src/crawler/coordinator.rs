//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding and draining the frontier
//! - Dispatching fetches to worker tasks
//! - Applying the resource policy and recording every visited URL
//! - Handling deadlines, page limits and interrupts
//! - Serializing the sitemap
//!
//! The coordinator is the only owner of the frontier and the sitemap builder.
//! Workers fetch and parse pages and hand the discovered links back, so the
//! visited check and every record append happen on a single task.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_links, ExtractedLinks};
use crate::crawler::FetchFailure;
use crate::output::{
    ChangeFrequency, CrawlStats, RecordParams, SitemapBuilder, SitemapDocument, StopReason,
    UNREACHABLE_PRIORITY,
};
use crate::url::{classify_resource, ResourceKind, Site};
use crate::SitemapError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// What a worker learned about one page
#[derive(Debug)]
enum PageOutcome {
    /// Page fetched; carries the links found on it
    Crawled(ExtractedLinks),
    /// Page could not be fetched
    Unreachable(FetchFailure),
}

/// Finished crawl: the written sitemap and the statistics collected on the way
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub document: SitemapDocument,
    pub stats: CrawlStats,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    site: Arc<Site>,
    fetcher: Fetcher,
    frontier: Frontier,
    sitemap: SitemapBuilder,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, builds the HTTP client, and seeds the
    /// frontier with the homepage.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SitemapError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, SitemapError> {
        validate(&config)?;

        let site = Site::new(&config.site.homepage)?;
        let fetcher = Fetcher::new(&config)?;

        let mut sitemap = SitemapBuilder::new(site.homepage(), &config.output.file_name)
            .with_namespace(config.output.namespace, site.homepage());
        if let Some(directory) = &config.output.directory {
            sitemap = sitemap.in_directory(directory);
        }

        let mut frontier = Frontier::new(config.crawler.max_frontier);
        frontier.push(site.homepage().to_string());

        Ok(Self {
            config,
            site: Arc::new(site),
            fetcher,
            frontier,
            sitemap,
            stats: CrawlStats::new(),
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Runs the crawl until the frontier is exhausted or a limit is hit
    pub async fn run(self) -> Result<CrawlReport, SitemapError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the crawl, stopping early when `shutdown` completes
    ///
    /// However the loop ends, the records collected so far are serialized.
    ///
    /// # Crawl Loop
    ///
    /// 1. Pop unvisited URLs while fewer than `max-concurrent-fetches` are in flight
    /// 2. Non-HTML documents are recorded immediately without a fetch
    /// 3. HTML pages are fetched and parsed on worker tasks
    /// 4. Each finished page pushes its in-scope links and is recorded;
    ///    failed pages are recorded as unreachable
    /// 5. Stop when nothing is queued or in flight, the page limit is
    ///    reached, the deadline passes, or `shutdown` fires
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<CrawlReport, SitemapError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Starting crawl of {}", self.site.homepage());

        let deadline = sleep_for(self.config.crawler.crawl_timeout());
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        let max_in_flight = self.config.crawler.max_concurrent_fetches as usize;
        let mut in_flight: JoinSet<(String, PageOutcome)> = JoinSet::new();

        let reason = loop {
            while in_flight.len() < max_in_flight && !self.page_limit_reached() {
                let Some(url) = self.frontier.pop() else {
                    break;
                };

                let kind = classify_resource(&url);
                if !kind.should_fetch() {
                    self.record_document(&url, kind)?;
                    continue;
                }

                tracing::debug!("Fetching {}", url);
                in_flight.spawn(fetch_page(
                    self.fetcher.clone(),
                    Arc::clone(&self.site),
                    url,
                ));
            }

            if in_flight.is_empty() {
                if self.frontier.is_empty() {
                    tracing::info!("Frontier is empty, crawl complete");
                    break StopReason::Exhausted;
                }
                tracing::warn!(
                    "Page limit of {} reached with {} URLs still queued",
                    self.config.crawler.max_pages.unwrap_or_default(),
                    self.frontier.len()
                );
                break StopReason::PageLimit;
            }

            tokio::select! {
                joined = in_flight.join_next() => match joined {
                    Some(Ok((url, outcome))) => self.handle_outcome(url, outcome)?,
                    Some(Err(e)) => tracing::error!("Fetch task failed: {}", e),
                    None => {}
                },
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, stopping crawl");
                    break StopReason::Interrupted;
                }
                _ = &mut deadline => {
                    tracing::warn!("Crawl deadline reached, stopping crawl");
                    break StopReason::Deadline;
                }
            }
        };

        if !in_flight.is_empty() {
            tracing::warn!("Abandoning {} in-flight fetches", in_flight.len());
            in_flight.abort_all();
        }

        self.finish(reason)
    }

    /// Returns true once `max-pages` URLs have been dequeued
    fn page_limit_reached(&self) -> bool {
        self.config
            .crawler
            .max_pages
            .is_some_and(|max| self.frontier.visited_count() >= max)
    }

    /// Applies a worker's result: expands links and records the page
    fn handle_outcome(&mut self, url: String, outcome: PageOutcome) -> Result<(), SitemapError> {
        match outcome {
            PageOutcome::Crawled(extracted) => {
                self.stats.out_of_scope_links += extracted.out_of_scope as u64;
                for link in extracted.links {
                    if self.frontier.push(link) {
                        self.stats.links_discovered += 1;
                    }
                }

                let kind = ResourceKind::HtmlPage;
                self.record(
                    &url,
                    RecordParams::at(url.as_str()).change_frequency(kind.change_frequency()),
                    true,
                )?;
                self.stats.pages_crawled += 1;
            }
            PageOutcome::Unreachable(failure) => {
                tracing::warn!("Unreachable {}: {}", url, failure);
                self.record(
                    &url,
                    RecordParams::at(url.as_str())
                        .change_frequency(ChangeFrequency::Never)
                        .priority(UNREACHABLE_PRIORITY),
                    false,
                )?;
                self.stats.unreachable += 1;
            }
        }
        Ok(())
    }

    /// Records a non-HTML document without fetching it
    fn record_document(&mut self, url: &str, kind: ResourceKind) -> Result<(), SitemapError> {
        tracing::debug!("Recording document {} without fetching", url);

        let mut params = RecordParams::at(url).change_frequency(kind.change_frequency());
        if let Some(priority) = kind.default_priority() {
            params = params.priority(priority);
        }
        self.record(url, params, true)?;
        self.stats.documents += 1;
        Ok(())
    }

    fn record(&mut self, url: &str, params: RecordParams, valid: bool) -> Result<(), SitemapError> {
        self.sitemap.add_url(params, valid)?;
        self.frontier.mark_recorded(url)?;

        let recorded = self.sitemap.len();
        if recorded % 10 == 0 {
            tracing::info!(
                "Progress: {} URLs recorded, {} in frontier",
                recorded,
                self.frontier.len()
            );
        }
        Ok(())
    }

    /// Stamps statistics and writes the sitemap
    fn finish(mut self, reason: StopReason) -> Result<CrawlReport, SitemapError> {
        self.stats.duplicates_skipped = self.frontier.duplicates_skipped();
        self.stats.frontier_overflow = self.frontier.overflow();
        self.stats.finish(reason);

        tracing::info!(
            "Finished building sitemap of {} links ({}) in {}s",
            self.stats.total_records(),
            reason,
            self.stats.duration_seconds().unwrap_or_default()
        );

        let document = self.sitemap.serialize()?;

        Ok(CrawlReport {
            document,
            stats: self.stats,
        })
    }
}

/// Worker body: fetch one page and extract its links
async fn fetch_page(fetcher: Fetcher, site: Arc<Site>, url: String) -> (String, PageOutcome) {
    let outcome = match fetcher.fetch(&url).await {
        FetchResult::Success {
            final_url, body, ..
        } => {
            // A redirect off the site yields a foreign page; record it but do not expand it
            if site.normalize(&final_url).is_none() {
                tracing::debug!("{} redirected off-site to {}", url, final_url);
                PageOutcome::Crawled(ExtractedLinks::default())
            } else {
                parse_links(move || extract_links(&body, &site)).await
            }
        }
        FetchResult::Failure(failure) => PageOutcome::Unreachable(failure),
    };
    (url, outcome)
}

/// Runs a link extractor on the blocking pool
///
/// A panic while parsing makes the page unreachable instead of losing its URL.
async fn parse_links<F>(parse: F) -> PageOutcome
where
    F: FnOnce() -> ExtractedLinks + Send + 'static,
{
    match tokio::task::spawn_blocking(parse).await {
        Ok(extracted) => PageOutcome::Crawled(extracted),
        Err(e) => PageOutcome::Unreachable(FetchFailure::Parse(e.to_string())),
    }
}

/// Sleeps for `limit`, or forever when there is no limit
async fn sleep_for(limit: Option<Duration>) {
    match limit {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending::<()>().await,
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::Config;
/// use sumi_sitemap::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::for_homepage("https://example.com")).await?;
/// println!("{} URLs written to {}", report.document.len(), report.document.path().display());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, SitemapError> {
    Coordinator::new(config)?.run().await
}
