//! Core library for lexmetric.
//!
//! Fetches web documents, caches their paragraph text, and scores each text
//! for sentiment, readability, and surface statistics.
//!
//! # Modules
//!
//! - [`lexicon`] - Stop-word and sentiment word lists
//! - [`text`] - Tokenization and sentence splitting
//! - [`sentiment`], [`readability`], [`surface`] - The three scorers
//! - [`metrics`] - The merged per-document record
//! - [`fetch`] - HTTP fetching and paragraph extraction
//! - [`cache`] - On-disk cache of extracted text
//! - [`batch`] - Single-URL and batch drivers
//! - [`table`] - CSV/JSON input and output
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use lexmetric_core::{Analyzer, DocumentCache, HttpFetcher, KeyStrategy, Lexicon};
//!
//! let lexicon = Lexicon::load("dictionaries").expect("word lists");
//! let cache = DocumentCache::new("extracted_texts", KeyStrategy::UrlHash);
//! let fetcher = HttpFetcher::new(Default::default()).expect("HTTP client");
//! let analyzer = Analyzer::new(lexicon, cache, fetcher);
//!
//! let metrics = analyzer.analyze_url("https://example.com/").expect("analysis");
//! println!("fog index: {:.2}", metrics.fog_index);
//! ```
#![deny(unsafe_code)]

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lexicon;
pub mod metrics;
pub mod readability;
pub mod sentiment;
pub mod surface;
pub mod table;
pub mod text;

pub use batch::{Analyzer, BatchEntry, BatchOptions, BatchResult};
pub use cache::{CachedDocument, DocumentCache, KeyStrategy};
pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{
    CacheError, CacheResult, ConfigError, ConfigResult, FetchError, LexiconError, LexiconResult,
    TableError, TableResult,
};
pub use fetch::{FetchConfig, Fetcher, HttpFetcher};
pub use lexicon::Lexicon;
pub use metrics::{MetricsRecord, analyze_text};
