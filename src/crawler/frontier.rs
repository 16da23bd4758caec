//! Crawl frontier and visited set
//!
//! The frontier is a FIFO queue of discovered URLs plus a state map that
//! doubles as the visited set. Duplicate pushes are accepted; the visited
//! check happens once, at dequeue time.

use crate::state::PageState;
use crate::SitemapError;
use std::collections::{HashMap, VecDeque};

/// Work queue plus visited set
#[derive(Debug)]
pub struct Frontier {
    /// URLs waiting to be processed (may contain duplicates)
    queue: VecDeque<String>,

    /// Lifecycle state of every URL ever pushed
    states: HashMap<String, PageState>,

    /// Maximum number of distinct URLs waiting to be processed
    max_queued: usize,

    /// Distinct URLs currently in the `Queued` state
    pending: usize,

    visited: usize,
    duplicates_skipped: u64,
    overflow: u64,
}

impl Frontier {
    /// Creates an empty frontier holding at most `max_queued` distinct URLs
    pub fn new(max_queued: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            states: HashMap::new(),
            max_queued,
            pending: 0,
            visited: 0,
            duplicates_skipped: 0,
            overflow: 0,
        }
    }

    /// Enqueues a URL
    ///
    /// Already queued or visited URLs are still accepted and filtered out by
    /// [`Frontier::pop`]. The capacity limit applies to distinct pending URLs
    /// only, so repeated links never crowd out new ones. Returns false if the
    /// URL is new, the frontier is full and the URL was dropped.
    pub fn push(&mut self, url: String) -> bool {
        if !self.states.contains_key(&url) {
            if self.pending >= self.max_queued {
                self.overflow += 1;
                tracing::warn!("Frontier full ({} URLs), dropping {}", self.max_queued, url);
                return false;
            }
            self.states.insert(url.clone(), PageState::Queued);
            self.pending += 1;
        }

        self.queue.push_back(url);
        true
    }

    /// Dequeues the next unvisited URL and marks it as processing
    ///
    /// Entries for URLs that were already visited are discarded. This is the
    /// only place deduplication happens.
    pub fn pop(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            match self.states.get(&url) {
                Some(state) if state.is_visited() => {
                    self.duplicates_skipped += 1;
                    tracing::trace!("Skipping already visited {}", url);
                }
                _ => {
                    self.pending = self.pending.saturating_sub(1);
                    self.states.insert(url.clone(), PageState::Processing);
                    self.visited += 1;
                    return Some(url);
                }
            }
        }
        None
    }

    /// Marks a processing URL as recorded
    ///
    /// # Errors
    ///
    /// `SitemapError::InvalidTransition` if the URL is not currently processing.
    pub fn mark_recorded(&mut self, url: &str) -> Result<(), SitemapError> {
        let from = self.states.get(url).copied();
        if !PageState::Recorded.can_follow(from) {
            return Err(SitemapError::InvalidTransition {
                url: url.to_string(),
                from,
                to: PageState::Recorded,
            });
        }
        self.states.insert(url.to_string(), PageState::Recorded);
        Ok(())
    }

    /// Current state of a URL, `None` if never seen
    pub fn state(&self, url: &str) -> Option<PageState> {
        self.states.get(url).copied()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.state(url).is_some_and(|state| state.is_visited())
    }

    /// Number of URLs dequeued so far
    pub fn visited_count(&self) -> usize {
        self.visited
    }

    /// Number of queued entries, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates_skipped
    }

    /// Number of distinct URLs waiting to be processed
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Number of pushes dropped because the queue was full
    pub fn overflow(&self) -> u64 {
        self.overflow
    }
}
