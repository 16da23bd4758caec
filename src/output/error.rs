//! Output error types

use thiserror::Error;

/// Errors that can occur while building or writing a sitemap
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Sitemap record is missing its location")]
    MissingLocation,

    #[error("Invalid priority '{0}': expected a decimal between 0.0 and 1.0")]
    InvalidPriority(String),

    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
