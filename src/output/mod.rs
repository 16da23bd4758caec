//! Output module for building and writing the sitemap
//!
//! This module handles:
//! - Validating and accumulating per-URL sitemap records
//! - Serializing the finished document as XML
//! - Recording crawl statistics

mod error;
mod record;
mod sitemap;
pub mod stats;

pub use error::{OutputError, OutputResult};
pub use record::{ChangeFrequency, RecordParams, SitemapRecord, UNREACHABLE_PRIORITY};
pub use sitemap::{
    NamespaceStyle, SitemapBuilder, SitemapDocument, INVALID_MARKER, SITEMAPS_ORG_NAMESPACE,
};
pub use stats::{print_statistics, CrawlStats, StopReason};
