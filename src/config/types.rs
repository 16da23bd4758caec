use crate::output::NamespaceStyle;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// `User-Agent` sent when the configuration does not name one
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; rv:78.0) Gecko/20100101 Firefox/78.0";

/// Main configuration structure for Sumi-Sitemap
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    /// Extra request headers, sent with every fetch
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Default configuration for crawling `homepage`
    pub fn for_homepage(homepage: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                homepage: homepage.into(),
            },
            ..Self::default()
        }
    }

    /// Request headers with a `User-Agent` guaranteed to be present
    ///
    /// Header names are matched case-insensitively, so a configured
    /// `user-agent` replaces the default.
    pub fn request_headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.headers.clone();
        let has_user_agent = headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("user-agent"));
        if !has_user_agent {
            headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
        }
        headers
    }
}

/// The site to crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Homepage URL; the crawl seed and the scope prefix
    #[serde(default)]
    pub homepage: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Wall-clock limit for the whole crawl in seconds
    #[serde(rename = "crawl-timeout-secs", default)]
    pub crawl_timeout_secs: Option<u64>,

    /// Maximum number of URLs to visit
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Maximum number of entries waiting in the frontier
    #[serde(rename = "max-frontier", default = "default_max_frontier")]
    pub max_frontier: usize,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn crawl_timeout(&self) -> Option<Duration> {
        self.crawl_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            crawl_timeout_secs: None,
            max_pages: None,
            max_frontier: default_max_frontier(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Base name of the sitemap file; `.xml` is appended
    #[serde(rename = "file-name", default = "default_file_name")]
    pub file_name: String,

    /// Directory the sitemap is written to (current directory if unset)
    #[serde(default)]
    pub directory: Option<String>,

    /// Value written to the `xmlns` attribute of `<urlset>`
    #[serde(default)]
    pub namespace: NamespaceStyle,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            directory: None,
            namespace: NamespaceStyle::default(),
        }
    }
}

fn default_concurrency() -> u32 {
    4
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_frontier() -> usize {
    100_000
}

fn default_file_name() -> String {
    "sitemap".to_string()
}
