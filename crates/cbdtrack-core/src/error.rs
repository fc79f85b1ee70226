//! Error types for cbdtrack-core.

use thiserror::Error;

/// Result type for cbdtrack-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or processing the feed.
#[derive(Debug, Error)]
pub enum Error {
    /// Feed request failed (connect, timeout, or non-success status).
    #[error("feed request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// CSV content could not be parsed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the feed header.
    #[error("missing column in feed: {name}")]
    MissingColumn { name: String },

    /// IO error with file context.
    #[error("IO error at {path}: {message}")]
    Io { path: String, message: String },
}
