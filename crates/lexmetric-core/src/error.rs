//! Error types for lexmetric-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading word lists.
///
/// A missing word-list file is not an error; it loads as an empty set.
#[derive(Error, Debug)]
pub enum LexiconError {
    /// A word-list file exists but could not be read.
    #[error("failed to read word list {path}")]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`LexiconError`].
pub type LexiconResult<T> = Result<T, LexiconError>;

/// Errors produced by a [`Fetcher`](crate::fetch::Fetcher).
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not finish within the configured timeout.
    #[error("request timed out after {timeout} seconds")]
    Timeout {
        /// Configured timeout in seconds.
        timeout: u64,
    },

    /// The server answered with a non-success status.
    ///
    /// Error pages are not parsed for paragraphs: a 404 or 500 body is
    /// treated as a failed fetch, so no cache entry is written and the row
    /// is reported as failed.
    #[error("server returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body exceeded the configured size limit.
    #[error("response body is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Observed body size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Errors from the document cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Fetching the document failed; no cache entry was created.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reading or writing a cache file failed.
    #[error("cache I/O error at {path}")]
    Io {
        /// Cache file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`CacheError`].
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors from reading or writing result tables.
#[derive(Error, Debug)]
pub enum TableError {
    /// The input table has no `URL` column.
    #[error("input table {path} has no column named `{column}` (found: {found})")]
    MissingColumn {
        /// Input file.
        path: PathBuf,
        /// The required column name.
        column: &'static str,
        /// Comma-separated list of the headers that were present.
        found: String,
    },

    /// CSV parsing or writing failed.
    #[error("CSV error in {path}")]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// JSON serialization failed.
    #[error("failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),

    /// Plain file I/O failed.
    #[error("failed to access {path}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`TableError`].
pub type TableResult<T> = Result<T, TableError>;
