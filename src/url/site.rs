use crate::{UrlError, UrlResult};
use url::Url;

/// Outcome of classifying a raw href against the crawled site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkScope {
    /// Link belongs to the site; carries the normalized absolute URL
    Internal(String),
    /// Link points elsewhere (other origin, mailto:, javascript:, fragment, ...)
    External,
}

impl LinkScope {
    /// Returns the normalized URL for in-scope links
    pub fn into_internal(self) -> Option<String> {
        match self {
            Self::Internal(url) => Some(url),
            Self::External => None,
        }
    }
}

/// The website being crawled, identified by its homepage
///
/// All scope decisions and link normalization are made against the homepage
/// string. A trailing slash on the homepage is ignored when prefixing
/// root-relative links, so `https://example.com/` and `https://example.com`
/// produce the same absolute links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    homepage: String,
    base: String,
}

impl Site {
    /// Creates a site from its homepage URL
    ///
    /// The homepage must be an absolute `http` or `https` URL with a host.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_sitemap::url::Site;
    ///
    /// let site = Site::new("https://example.com").unwrap();
    /// assert_eq!(site.base(), "https://example.com");
    /// assert!(Site::new("ftp://example.com").is_err());
    /// ```
    pub fn new(homepage: &str) -> UrlResult<Self> {
        let homepage = homepage.trim();
        let parsed = Url::parse(homepage).map_err(|e| UrlError::Parse(e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none() {
            return Err(UrlError::MissingDomain);
        }

        Ok(Self {
            homepage: homepage.to_string(),
            base: homepage.trim_end_matches('/').to_string(),
        })
    }

    /// The homepage exactly as configured; this is the crawl seed
    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    /// The homepage without a trailing slash, used as the scope prefix
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Classifies an href found on a page of this site
    ///
    /// # Rules
    ///
    /// - Root-relative (`/about`) → in scope, rewritten as `base + href`
    /// - Absolute starting with the base, where the match ends at a URL
    ///   boundary (`/`, `?`, `#` or end of string) → in scope, unchanged
    /// - Protocol-relative (`//cdn.example.net/x`) → out of scope
    /// - Anything else → out of scope
    ///
    /// Empty and malformed hrefs fail every rule and are simply out of scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_sitemap::url::{LinkScope, Site};
    ///
    /// let site = Site::new("https://example.com").unwrap();
    /// assert_eq!(
    ///     site.classify_link("/about"),
    ///     LinkScope::Internal("https://example.com/about".to_string())
    /// );
    /// assert_eq!(site.classify_link("https://other.com/x"), LinkScope::External);
    /// ```
    pub fn classify_link(&self, href: &str) -> LinkScope {
        let href = href.trim();

        // Protocol-relative links name their own host
        if href.starts_with("//") {
            return LinkScope::External;
        }

        if href.starts_with('/') {
            return LinkScope::Internal(format!("{}{}", self.base, href));
        }

        if let Some(rest) = href.strip_prefix(self.base.as_str()) {
            if rest.is_empty() || rest.starts_with(|c: char| matches!(c, '/' | '?' | '#')) {
                return LinkScope::Internal(href.to_string());
            }
        }

        LinkScope::External
    }

    /// Convenience wrapper returning the normalized URL for in-scope links
    pub fn normalize(&self, href: &str) -> Option<String> {
        self.classify_link(href).into_internal()
    }
}
