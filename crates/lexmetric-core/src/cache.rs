//! On-disk cache of extracted document text.
//!
//! [`DocumentCache::fetch_or_reuse`] returns the cached text for a URL when a
//! cache file exists and otherwise fetches, extracts, and persists it. A
//! failed fetch never creates a cache file.
//!
//! # Cache keys
//!
//! - [`KeyStrategy::UrlHash`] (default): `<label>-<sha256 prefix>.txt`, stable
//!   for a URL no matter where it appears in a batch.
//! - [`KeyStrategy::Positional`]: `<label><index>.txt`, the layout older
//!   cache directories use. Two runs that put different URLs from one domain
//!   at the same position share a key, so it is opt-in.
//!
//! Hashed keys use [`domain_label`], the second-level domain label of the
//! host (`example` for `www.example.com` and for `example.com`). Positional
//! keys use [`positional_label`], the second dot-separated piece of the
//! authority (`example` for `www.example.com`, `com` for `example.com`), so
//! existing positional directories keep resolving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::{Host, Url};

use crate::error::{CacheError, CacheResult};
use crate::fetch::{self, Fetcher};

/// Hex digits of the URL digest kept in a hashed key.
const HASH_HEX_LEN: usize = 16;

/// Label used when a URL has no host.
const FALLBACK_LABEL: &str = "document";

/// How cache file names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum KeyStrategy {
    /// Domain label plus a digest of the normalized URL.
    #[default]
    UrlHash,
    /// Domain label plus the 1-based position in the batch.
    Positional,
}

impl KeyStrategy {
    /// Returns the strategy name as used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UrlHash => "url-hash",
            Self::Positional => "positional",
        }
    }
}

impl std::fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of one cache entry, without the `.txt` extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `url` at batch position `index`.
    pub fn new(url: &Url, index: usize, strategy: KeyStrategy) -> Self {
        match strategy {
            KeyStrategy::Positional => Self(format!("{}{index}", positional_label(url))),
            KeyStrategy::UrlHash => Self(format!("{}-{}", domain_label(url), url_digest(url))),
        }
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text produced by [`DocumentCache::fetch_or_reuse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    /// Extracted paragraph text (possibly empty).
    pub text: String,
    /// Cache file holding `text`.
    pub path: PathBuf,
    /// `true` if the text came from an existing cache file.
    pub from_cache: bool,
}

/// Directory of extracted document texts.
#[derive(Debug)]
pub struct DocumentCache {
    dir: PathBuf,
    strategy: KeyStrategy,
    locks: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl DocumentCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, strategy: KeyStrategy) -> Self {
        Self {
            dir: dir.into(),
            strategy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Root directory of the cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Key naming strategy.
    pub const fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Cache key for `url` at batch position `index`.
    pub fn key_for(&self, url: &Url, index: usize) -> CacheKey {
        CacheKey::new(url, index, self.strategy)
    }

    /// Cache file path for `url` at batch position `index`.
    pub fn path_for(&self, url: &Url, index: usize) -> PathBuf {
        self.dir.join(self.key_for(url, index).file_name())
    }

    /// Return cached text for `url`, fetching and persisting it on a miss.
    ///
    /// Concurrent callers asking for the same key wait for each other, so a
    /// key is fetched at most once.
    #[tracing::instrument(skip(self, fetcher), fields(cache = %self.dir.display()))]
    pub fn fetch_or_reuse<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        url: &str,
        index: usize,
    ) -> CacheResult<CachedDocument> {
        let url = fetch::parse_url(url)?;
        let key = self.key_for(&url, index);
        let path = self.dir.join(key.file_name());

        let lock = self.lock_for(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if path.is_file() {
            let text = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            debug!(key = %key, "cache hit");
            return Ok(CachedDocument {
                text,
                path,
                from_cache: true,
            });
        }

        let body = fetcher.fetch(&url)?;
        let text = fetch::extract_paragraphs(&body);
        self.persist(&key, &path, &text)?;
        info!(key = %key, bytes = text.len(), "document cached");
        Ok(CachedDocument {
            text,
            path,
            from_cache: false,
        })
    }

    fn lock_for(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Write through a temporary file so a partial write is never reused.
    fn persist(&self, key: &CacheKey, path: &Path, text: &str) -> CacheResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let tmp = self.dir.join(format!(".{}.tmp", key.file_name()));
        std::fs::write(&tmp, text).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| io_error(path, e))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Second-level domain label of the URL's host, safe for use in file names.
pub fn domain_label(url: &Url) -> String {
    let label = match url.host() {
        Some(Host::Domain(domain)) => {
            let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
            match labels.len() {
                0 => FALLBACK_LABEL.to_string(),
                1 | 2 => labels[0].to_string(),
                _ => labels[1].to_string(),
            }
        }
        Some(other) => other.to_string(),
        None => FALLBACK_LABEL.to_string(),
    };
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Second dot-separated piece of the URL's authority, as positional cache
/// directories name their files.
///
/// Authorities without a dot fall back to [`domain_label`].
pub fn positional_label(url: &Url) -> String {
    match url.authority().split('.').nth(1) {
        Some(piece) if !piece.is_empty() => piece.to_string(),
        _ => domain_label(url),
    }
}

/// Hex prefix of the SHA-256 digest of the URL without its fragment.
fn url_digest(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    let digest = Sha256::digest(normalized.as_str().as_bytes());
    digest
        .iter()
        .take(HASH_HEX_LEN / 2)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
