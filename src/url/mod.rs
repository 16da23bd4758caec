//! URL handling module for Sumi-Sitemap
//!
//! This module decides which links belong to the crawled site, rewrites them
//! into absolute form, and classifies URLs by the kind of resource they name.

mod resource;
mod site;

// Re-export main types
pub use resource::{classify_resource, ResourceKind, DOCUMENT_EXTENSIONS, DOCUMENT_PRIORITY};
pub use site::{LinkScope, Site};
