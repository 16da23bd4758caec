/// Page state definitions for tracking crawl progress
///
/// This module defines the states a URL moves through during a crawl.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Discovered and waiting in the frontier
    Queued,

    /// Dequeued and claimed; counts as visited
    Processing,

    /// A sitemap record has been written for this URL
    Recorded,
}

impl PageState {
    /// Returns true once the URL has been dequeued at least once
    ///
    /// A visited URL is never processed again; later dequeues are discarded.
    pub fn is_visited(&self) -> bool {
        matches!(self, Self::Processing | Self::Recorded)
    }

    /// Returns true if moving from `from` to `self` is a legal transition
    ///
    /// `None` stands for a URL that has never been seen.
    pub fn can_follow(&self, from: Option<PageState>) -> bool {
        matches!(
            (from, self),
            (None, Self::Queued)
                | (Some(Self::Queued), Self::Processing)
                | (Some(Self::Processing), Self::Recorded)
        )
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Recorded => "recorded",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
