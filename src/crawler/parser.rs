//! HTML parser for extracting in-scope links
//!
//! Every `<a href>` on a page is run through the site's link classifier.
//! In-scope links come back normalized; everything else is only counted.

use crate::url::{LinkScope, Site};
use scraper::{Html, Selector};

/// Links found on a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Normalized in-scope links, in document order, duplicates included
    pub links: Vec<String>,

    /// Number of anchors dropped as out of scope
    pub out_of_scope: usize,
}

/// Parses HTML content and extracts in-scope anchor links
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::extract_links;
/// use sumi_sitemap::url::Site;
///
/// let site = Site::new("https://example.com").unwrap();
/// let html = r#"<a href="/about">About</a><a href="https://other.com/">Other</a>"#;
/// let extracted = extract_links(html, &site);
/// assert_eq!(extracted.links, vec!["https://example.com/about".to_string()]);
/// assert_eq!(extracted.out_of_scope, 1);
/// ```
pub fn extract_links(html: &str, site: &Site) -> ExtractedLinks {
    let document = Html::parse_document(html);
    let mut extracted = ExtractedLinks::default();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return extracted;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match site.classify_link(href) {
            LinkScope::Internal(url) => extracted.links.push(url),
            LinkScope::External => {
                tracing::trace!("Dropping out-of-scope link {}", href);
                extracted.out_of_scope += 1;
            }
        }
    }

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site::new("https://example.com").unwrap()
    }

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        let extracted = extract_links(html, &site());
        assert_eq!(extracted.links, vec!["https://example.com/other"]);
        assert_eq!(extracted.out_of_scope, 0);
    }

    #[test]
    fn test_extract_absolute_same_site_link() {
        let html = r#"<html><body><a href="https://example.com/page">Link</a></body></html>"#;
        let extracted = extract_links(html, &site());
        assert_eq!(extracted.links, vec!["https://example.com/page"]);
    }

    #[test]
    fn test_skip_other_origin() {
        let html = r#"<html><body><a href="https://other.com/x">Link</a></body></html>"#;
        let extracted = extract_links(html, &site());
        assert!(extracted.links.is_empty());
        assert_eq!(extracted.out_of_scope, 1);
    }

    #[test]
    fn test_skip_special_links() {
        let html = r##"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="#section">Jump</a>
                <a href="">Empty</a>
                <a href="relative/path">Relative</a>
            </body></html>
        "##;
        let extracted = extract_links(html, &site());
        assert!(extracted.links.is_empty());
        assert_eq!(extracted.out_of_scope, 5);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a><a href="/a">A</a></body></html>"#;
        let extracted = extract_links(html, &site());
        assert_eq!(extracted.links, vec!["https://example.com/a"]);
        assert_eq!(extracted.out_of_scope, 0);
    }

    #[test]
    fn test_only_anchors_are_followed() {
        let html = r#"
            <html><head>
                <link rel="stylesheet" href="/style.css">
                <script src="/app.js"></script>
            </head><body><img src="/logo.png"></body></html>
        "#;
        let extracted = extract_links(html, &site());
        assert!(extracted.links.is_empty());
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        let html = r#"
            <html><body>
                <a href="/b">B</a>
                <a href="/a">A</a>
                <a href="https://example.com/b">B again</a>
            </body></html>
        "#;
        let extracted = extract_links(html, &site());
        assert_eq!(
            extracted.links,
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/b"
            ]
        );
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let html = r#"<html><body><a href="/ok">ok<div><a href=/unquoted>x</body>"#;
        let extracted = extract_links(html, &site());
        assert!(extracted.links.contains(&"https://example.com/ok".to_string()));
        assert!(extracted
            .links
            .contains(&"https://example.com/unquoted".to_string()));
    }
}
