//! Crawl statistics
//!
//! Counters owned by the coordinator for the duration of a crawl and handed
//! back with the finished sitemap.

use chrono::{DateTime, Utc};
use std::fmt;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The frontier emptied; every reachable URL was recorded
    Exhausted,
    /// `max-pages` URLs were visited
    PageLimit,
    /// `crawl-timeout-secs` elapsed
    Deadline,
    /// The shutdown signal fired (e.g. Ctrl-C)
    Interrupted,
}

impl StopReason {
    /// Returns true if the crawl ended before the frontier was exhausted
    pub fn is_cancelled(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "frontier exhausted",
            Self::PageLimit => "page limit reached",
            Self::Deadline => "crawl deadline reached",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// HTML pages fetched successfully
    pub pages_crawled: u64,

    /// Non-HTML documents recorded without fetching
    pub documents: u64,

    /// Pages recorded as invalid
    pub unreachable: u64,

    /// In-scope links pushed onto the frontier
    pub links_discovered: u64,

    /// Anchors dropped by the link classifier
    pub out_of_scope_links: u64,

    /// Dequeues discarded because the URL was already visited
    pub duplicates_skipped: u64,

    /// Links dropped because the frontier was full
    pub frontier_overflow: u64,

    pub stop_reason: StopReason,
}

impl CrawlStats {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_crawled: 0,
            documents: 0,
            unreachable: 0,
            links_discovered: 0,
            out_of_scope_links: 0,
            duplicates_skipped: 0,
            frontier_overflow: 0,
            stop_reason: StopReason::Exhausted,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self, reason: StopReason) {
        self.stop_reason = reason;
        self.finished_at = Some(Utc::now());
    }

    /// Total number of sitemap records
    pub fn total_records(&self) -> u64 {
        self.pages_crawled + self.documents + self.unreachable
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Percentage of records that are valid
    pub fn success_rate(&self) -> f64 {
        let total = self.total_records();
        if total == 0 {
            return 0.0;
        }
        ((self.pages_crawled + self.documents) as f64 / total as f64) * 100.0
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!("  Stopped: {}", stats.stop_reason);
    println!();

    println!("Records:");
    println!("  Pages crawled: {}", stats.pages_crawled);
    println!("  Documents: {}", stats.documents);
    println!("  Unreachable: {}", stats.unreachable);
    println!();

    println!("Links:");
    println!("  In scope: {}", stats.links_discovered);
    println!("  Out of scope: {}", stats.out_of_scope_links);
    println!("  Duplicates skipped: {}", stats.duplicates_skipped);
    if stats.frontier_overflow > 0 {
        println!("  Dropped (frontier full): {}", stats.frontier_overflow);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} records valid)",
        stats.success_rate(),
        stats.pages_crawled + stats.documents,
        stats.total_records()
    );
}
