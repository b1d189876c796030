//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;

use lexmetric_core::metrics::MetricValue;
use lexmetric_core::{
    Analyzer, Config, DocumentCache, HttpFetcher, KeyStrategy, Lexicon, MetricsRecord,
};

pub mod analyze;
pub mod batch;
pub mod info;
pub mod score;

/// Word-list location, shared by every command that scores text.
#[derive(Args, Debug, Default, Clone)]
pub struct LexiconArgs {
    /// Directory with StopWords.txt, positive-words.txt, negative-words.txt
    #[arg(long, value_name = "DIR")]
    pub lexicon_dir: Option<Utf8PathBuf>,
}

/// Flags for commands that fetch and cache documents.
#[derive(Args, Debug, Default, Clone)]
pub struct AnalysisArgs {
    #[command(flatten)]
    pub lexicon: LexiconArgs,

    /// Directory for cached extracted texts
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// How cache file names are derived
    #[arg(long, value_enum)]
    pub cache_key: Option<KeyStrategy>,
}

impl LexiconArgs {
    /// Word-list directory: flag, then config.
    pub fn lexicon_dir<'a>(&'a self, config: &'a Config) -> &'a Utf8Path {
        self.lexicon_dir.as_deref().unwrap_or(&config.lexicon_dir)
    }

    /// Load the session lexicon.
    pub fn load_lexicon(&self, config: &Config) -> anyhow::Result<Lexicon> {
        let dir = self.lexicon_dir(config);
        let lexicon = Lexicon::load(dir.as_std_path())
            .with_context(|| format!("failed to load word lists from {dir}"))?;
        if lexicon.is_empty() {
            tracing::warn!(dir = %dir, "no word lists found; sentiment scores will be zero");
        }
        Ok(lexicon)
    }
}

impl AnalysisArgs {
    /// Build the analyzer used by `analyze` and `batch`.
    pub fn build_analyzer(&self, config: &Config) -> anyhow::Result<Analyzer<HttpFetcher>> {
        let lexicon = self.lexicon.load_lexicon(config)?;
        let cache_dir = self.cache_dir.as_deref().unwrap_or(&config.cache_dir);
        let strategy = self.cache_key.unwrap_or(config.cache_key);
        let cache = DocumentCache::new(cache_dir.as_std_path(), strategy);
        let fetcher =
            HttpFetcher::new(config.fetch_config()).context("failed to build HTTP client")?;
        Ok(Analyzer::new(lexicon, cache, fetcher))
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Print a metrics record as an aligned, labelled list.
pub fn print_metrics(title: &str, metrics: &MetricsRecord) {
    println!("{}", title.bold());
    let fields = metrics.fields();
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in fields {
        let value = match value {
            MetricValue::Count(_) => value.to_string(),
            MetricValue::Ratio(_) => format!("{value:.4}"),
        };
        println!("  {:<width$}  {}", format!("{name}:").dimmed(), value.cyan());
    }
}
