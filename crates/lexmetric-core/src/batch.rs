//! Batch analysis of URL lists.
//!
//! An [`Analyzer`] owns the session state (lexicon, cache, fetcher) and turns
//! each URL into either metrics or a failure reason. One URL failing never
//! stops the batch, and the result always has one entry per input URL, in
//! input order.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{CachedDocument, DocumentCache};
use crate::error::CacheResult;
use crate::fetch::Fetcher;
use crate::lexicon::Lexicon;
use crate::metrics::{self, MetricsRecord};

/// Options for [`Analyzer::run_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads. `0` and `1` both mean sequential.
    pub jobs: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Outcome for one input URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchEntry {
    /// Metrics were computed.
    Analyzed {
        /// The input URL as given.
        url: String,
        /// Computed metrics.
        metrics: MetricsRecord,
    },
    /// Fetching or caching failed.
    Failed {
        /// The input URL as given.
        url: String,
        /// Human-readable failure cause.
        reason: String,
    },
}

impl BatchEntry {
    /// The input URL.
    pub fn url(&self) -> &str {
        match self {
            Self::Analyzed { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    /// Metrics, if the URL was analyzed.
    pub const fn metrics(&self) -> Option<&MetricsRecord> {
        match self {
            Self::Analyzed { metrics, .. } => Some(metrics),
            Self::Failed { .. } => None,
        }
    }

    /// Failure reason, if the URL failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Analyzed { .. } => None,
            Self::Failed { reason, .. } => Some(reason),
        }
    }

    /// `true` for [`BatchEntry::Failed`].
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Ordered outcomes of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    /// Number of entries (always the number of input URLs).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the batch had no URLs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, BatchEntry> {
        self.entries.iter()
    }

    /// Entries as a slice.
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Count of analyzed entries.
    pub fn analyzed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_failed()).count()
    }

    /// Count of failed entries.
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_failed()).count()
    }
}

impl FromIterator<BatchEntry> for BatchResult {
    fn from_iter<I: IntoIterator<Item = BatchEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BatchResult {
    type Item = BatchEntry;
    type IntoIter = std::vec::IntoIter<BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a BatchEntry;
    type IntoIter = std::slice::Iter<'a, BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Session-level analysis context.
#[derive(Debug)]
pub struct Analyzer<F> {
    lexicon: Arc<Lexicon>,
    cache: DocumentCache,
    fetcher: F,
}

impl<F: Fetcher> Analyzer<F> {
    /// Create an analyzer from a loaded lexicon, a cache, and a fetcher.
    pub fn new(lexicon: impl Into<Arc<Lexicon>>, cache: DocumentCache, fetcher: F) -> Self {
        Self {
            lexicon: lexicon.into(),
            cache,
            fetcher,
        }
    }

    /// The session lexicon.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// The document cache.
    pub const fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Score text that is already in memory.
    pub fn analyze_text(&self, text: &str) -> MetricsRecord {
        metrics::analyze_text(text, &self.lexicon)
    }

    /// Fetch (or reuse) and score a single URL.
    pub fn analyze_url(&self, url: &str) -> CacheResult<MetricsRecord> {
        self.analyze_at(url, 1).map(|(_, metrics)| metrics)
    }

    /// Fetch (or reuse) and score a single URL, also returning the document.
    pub fn analyze_document(&self, url: &str) -> CacheResult<(CachedDocument, MetricsRecord)> {
        self.analyze_at(url, 1)
    }

    fn analyze_at(&self, url: &str, index: usize) -> CacheResult<(CachedDocument, MetricsRecord)> {
        let doc = self.cache.fetch_or_reuse(&self.fetcher, url, index)?;
        let metrics = self.analyze_text(&doc.text);
        Ok((doc, metrics))
    }

    /// Analyze every URL, isolating failures per URL.
    ///
    /// `on_done` is called once per URL as it finishes, possibly from worker
    /// threads and out of input order. The returned entries are in input order.
    #[tracing::instrument(skip_all, fields(urls = urls.len(), jobs = options.jobs))]
    pub fn run_batch<S, C>(&self, urls: &[S], options: &BatchOptions, on_done: C) -> BatchResult
    where
        S: AsRef<str> + Sync,
        C: Fn(&BatchEntry) + Sync,
    {
        let process = |(i, url): (usize, &S)| {
            let entry = self.process_one(url.as_ref(), i + 1);
            on_done(&entry);
            entry
        };

        let entries: Vec<BatchEntry> = if options.jobs <= 1 {
            urls.iter().enumerate().map(process).collect()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(options.jobs)
                .build()
            {
                Ok(pool) => pool.install(|| urls.par_iter().enumerate().map(process).collect()),
                Err(e) => {
                    warn!(error = %e, "could not start worker pool, running sequentially");
                    urls.iter().enumerate().map(process).collect()
                }
            }
        };

        let result = BatchResult { entries };
        info!(
            analyzed = result.analyzed_count(),
            failed = result.failed_count(),
            "batch complete"
        );
        result
    }

    fn process_one(&self, url: &str, index: usize) -> BatchEntry {
        match self.analyze_at(url, index) {
            Ok((_, metrics)) => BatchEntry::Analyzed {
                url: url.to_string(),
                metrics,
            },
            Err(e) => {
                warn!(url, error = %e, "failed to analyze");
                BatchEntry::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::KeyStrategy;
    use crate::error::FetchError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use url::Url;

    /// Serves canned bodies by path; any path containing "fail" is a 404.
    struct StubFetcher;

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            if url.path().contains("fail") {
                return Err(FetchError::Status { status: 404 });
            }
            Ok(format!("<p>Good news from {}.</p>", url.path().trim_matches('/')))
        }
    }

    fn analyzer(dir: &TempDir) -> Analyzer<StubFetcher> {
        let lexicon = Lexicon::from_words(["from"], ["good"], ["bad"]);
        let cache = DocumentCache::new(dir.path(), KeyStrategy::UrlHash);
        Analyzer::new(lexicon, cache, StubFetcher)
    }

    #[test]
    fn middle_failure_is_isolated() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);
        let urls = [
            "https://example.com/one",
            "https://example.com/fail",
            "https://example.com/three",
        ];

        let result = analyzer.run_batch(&urls, &BatchOptions::default(), |_| {});

        assert_eq!(result.len(), 3);
        assert_eq!(result.analyzed_count(), 2);
        assert_eq!(result.failed_count(), 1);
        let entries = result.entries();
        assert_eq!(entries[0].url(), urls[0]);
        assert_eq!(entries[0].metrics().unwrap().positive_score, 1);
        assert!(entries[1].is_failed());
        assert!(entries[1].reason().unwrap().contains("404"));
        assert!(entries[2].metrics().is_some());
    }

    #[test]
    fn invalid_url_is_a_failed_entry() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);

        let result = analyzer.run_batch(&["nonsense"], &BatchOptions::default(), |_| {});

        assert_eq!(result.len(), 1);
        assert!(result.entries()[0].reason().unwrap().contains("invalid URL"));
    }

    #[test]
    fn blank_url_keeps_its_row() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);
        let urls = ["https://example.com/a", "", "https://example.com/c"];

        let result = analyzer.run_batch(&urls, &BatchOptions::default(), |_| {});

        assert_eq!(result.len(), 3);
        let entries = result.entries();
        assert_eq!(entries[1].url(), "");
        assert_eq!(entries[1].reason(), Some("invalid URL: empty"));
        assert!(entries[2].metrics().is_some());
    }

    #[test]
    fn parallel_run_preserves_order_and_length() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);
        let urls: Vec<String> = (0..20)
            .map(|i| {
                if i % 5 == 0 {
                    format!("https://example.com/fail{i}")
                } else {
                    format!("https://example.com/page{i}")
                }
            })
            .collect();
        let done = AtomicUsize::new(0);

        let result = analyzer.run_batch(&urls, &BatchOptions { jobs: 4 }, |_| {
            done.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(result.len(), urls.len());
        assert_eq!(done.load(Ordering::SeqCst), urls.len());
        assert_eq!(result.failed_count(), 4);
        for (entry, url) in result.iter().zip(&urls) {
            assert_eq!(entry.url(), url);
        }
    }

    #[test]
    fn empty_batch_is_empty_result() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);
        let result = analyzer.run_batch(&Vec::<String>::new(), &BatchOptions::default(), |_| {});
        assert!(result.is_empty());
    }

    #[test]
    fn progress_sees_every_entry() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);
        let seen = Mutex::new(Vec::new());

        analyzer.run_batch(
            &["https://example.com/a", "https://example.com/fail"],
            &BatchOptions::default(),
            |entry| seen.lock().unwrap().push(entry.is_failed()),
        );

        assert_eq!(seen.into_inner().unwrap(), vec![false, true]);
    }

    #[test]
    fn analyze_url_caches_document() {
        let tmp = TempDir::new().unwrap();
        let analyzer = analyzer(&tmp);

        let (doc, metrics) = analyzer.analyze_document("https://example.com/solo").unwrap();
        assert!(!doc.from_cache);
        assert!(doc.path.is_file());
        assert_eq!(metrics.positive_score, 1);

        let again = analyzer.analyze_url("https://example.com/solo").unwrap();
        assert_eq!(again, metrics);
    }

    #[test]
    fn failed_entry_serializes_with_status() {
        let entry = BatchEntry::Failed {
            url: "https://x.test/".to_string(),
            reason: "boom".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");
    }
}
