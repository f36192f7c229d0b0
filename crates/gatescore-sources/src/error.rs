//! Source error types.

use thiserror::Error;

/// Errors that can occur while fetching an input document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The location is not an `http` or `https` URL.
    #[error("unsupported URL (only http and https are fetched): {0}")]
    InvalidUrl(String),

    /// Connection, TLS or body decoding failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request or subprocess did not finish in time.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// An external converter is not installed.
    #[error("{0} not found on PATH")]
    ToolMissing(String),

    /// An external converter ran but failed.
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
