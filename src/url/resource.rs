use crate::output::ChangeFrequency;
use url::Url;

/// File extensions that are recorded without being downloaded
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".xlsx", ".csv", ".docx", ".doc"];

/// Priority assigned to non-HTML documents
pub const DOCUMENT_PRIORITY: &str = "0.8";

/// Kind of resource a URL points at, decided from its extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Anything not in the document list; fetched and scanned for links
    HtmlPage,
    /// Office documents, spreadsheets and PDFs; recorded but never fetched
    NonHtmlDocument,
}

impl ResourceKind {
    /// Returns true if the URL should be downloaded
    pub fn should_fetch(&self) -> bool {
        matches!(self, Self::HtmlPage)
    }

    /// Default change frequency for this kind of resource
    pub fn change_frequency(&self) -> ChangeFrequency {
        match self {
            Self::HtmlPage => ChangeFrequency::Daily,
            Self::NonHtmlDocument => ChangeFrequency::Never,
        }
    }

    /// Default priority, if any
    pub fn default_priority(&self) -> Option<&'static str> {
        match self {
            Self::HtmlPage => None,
            Self::NonHtmlDocument => Some(DOCUMENT_PRIORITY),
        }
    }
}

/// Classifies a URL by the extension of its path
///
/// The query string and fragment are ignored and the comparison is
/// case-sensitive, so `report.PDF` is treated as a page.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::{classify_resource, ResourceKind};
///
/// assert_eq!(
///     classify_resource("https://example.com/annual-report.pdf"),
///     ResourceKind::NonHtmlDocument
/// );
/// assert_eq!(classify_resource("https://example.com/about"), ResourceKind::HtmlPage);
/// ```
pub fn classify_resource(url: &str) -> ResourceKind {
    match path_extension(url) {
        Some(ext) if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) => ResourceKind::NonHtmlDocument,
        _ => ResourceKind::HtmlPage,
    }
}

/// Extracts the extension (including the dot) of the last path segment
///
/// URLs that do not parse have no extension.
fn path_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    match segment.rfind('.') {
        Some(idx) if idx > 0 => Some(segment[idx..].to_string()),
        _ => None,
    }
}
