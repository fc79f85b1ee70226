//! Error types for the dashboard server.

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Could not bind the listen address.
    #[error("cannot bind {addr}: {message}")]
    Bind { addr: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;
