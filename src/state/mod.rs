//! State module for tracking crawl progress
//!
//! Every URL moves through `queued → processing → recorded`. URLs that have
//! not been seen yet have no state at all.

mod page_state;

pub use page_state::PageState;
