// Error types for feedfetcher.
// Covers transport, persistence and configuration failures, plus the error kinds loaders deliver.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Missing FEEDFETCHER_FEED_URL environment variable")]
    MissingFeedUrl,

    #[error("No cache directory available, set FEEDFETCHER_CACHE_DIR")]
    NoCacheDir,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds reported by the remote loaders.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteError {
    /// No response was obtained from the remote source.
    #[error("Connectivity error: no response from the remote source")]
    Connectivity,

    /// A response arrived but its status or body was not acceptable.
    #[error("Invalid data in the remote response")]
    InvalidData,
}

/// Failure kinds reported when reading cached image data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadImageDataError {
    #[error("Failed to read image data from the cache")]
    Failed,

    #[error("No cached image data for the requested URL")]
    NotFound,
}

/// Failure kinds reported when writing image data to the cache.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveImageDataError {
    #[error("Failed to write image data to the cache")]
    Failed,
}
