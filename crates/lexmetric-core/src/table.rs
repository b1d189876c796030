//! Tabular input and output.
//!
//! Batch input is a CSV table with a `URL` column, or a `.txt` list with one
//! URL per line. Results are written as CSV, or as a JSON array when the
//! output path ends in `.json`. Every output row carries the URL, the metric
//! columns (empty for failures), and a `Status` column.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::batch::{BatchEntry, BatchResult};
use crate::error::{TableError, TableResult};
use crate::metrics::{COLUMNS, MetricsRecord};

/// Name of the required input column.
pub const URL_COLUMN: &str = "URL";
/// Name of the status output column.
pub const STATUS_COLUMN: &str = "Status";
/// Status value for analyzed rows.
pub const STATUS_OK: &str = "ok";

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow<'a> {
    /// Input URL.
    #[serde(rename = "URL")]
    pub url: &'a str,
    /// Metrics, absent for failures.
    #[serde(flatten)]
    pub metrics: Option<&'a MetricsRecord>,
    /// `ok` or `Failed to analyze: <reason>`.
    #[serde(rename = "Status")]
    pub status: String,
}

impl<'a> ResultRow<'a> {
    /// Row for a batch entry.
    pub fn from_entry(entry: &'a BatchEntry) -> Self {
        match entry {
            BatchEntry::Analyzed { url, metrics } => Self::analyzed(url, metrics),
            BatchEntry::Failed { url, reason } => Self {
                url,
                metrics: None,
                status: format!("Failed to analyze: {reason}"),
            },
        }
    }

    /// Row for an analyzed document.
    pub fn analyzed(url: &'a str, metrics: &'a MetricsRecord) -> Self {
        Self {
            url,
            metrics: Some(metrics),
            status: STATUS_OK.to_string(),
        }
    }

    fn csv_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(COLUMNS.len() + 2);
        record.push(self.url.to_string());
        match self.metrics {
            Some(metrics) => record.extend(metrics.fields().iter().map(|(_, v)| v.to_string())),
            None => record.extend(std::iter::repeat_n(String::new(), COLUMNS.len())),
        }
        record.push(self.status.clone());
        record
    }
}

/// Read the list of URLs to analyze.
///
/// `.txt` files hold one URL per line; blank lines and `#` comments are
/// skipped. Anything else is parsed as CSV and must have a `URL` column.
/// Every CSV data row yields one entry, in row order; a blank or missing cell
/// becomes an empty string, which the batch reports as a failed row.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_urls(path: impl AsRef<Path>) -> TableResult<Vec<String>> {
    let path = path.as_ref();
    if has_extension(path, "txt") {
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let urls: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect();
        debug!(count = urls.len(), "read URL list");
        return Ok(urls);
    }

    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == URL_COLUMN)
        .ok_or_else(|| TableError::MissingColumn {
            path: path.to_path_buf(),
            column: URL_COLUMN,
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let url = record.get(column).map(str::trim).unwrap_or_default();
        if url.is_empty() {
            debug!(line = record.position().map(csv::Position::line), "blank URL cell");
        }
        urls.push(url.to_string());
    }
    debug!(count = urls.len(), "read URL table");
    Ok(urls)
}

/// Write one row per batch entry to `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), rows = result.len()))]
pub fn write_results(path: impl AsRef<Path>, result: &BatchResult) -> TableResult<()> {
    let rows: Vec<ResultRow<'_>> = result.iter().map(ResultRow::from_entry).collect();
    write_rows(path.as_ref(), &rows)
}

/// Write a single analyzed document as a one-row table.
pub fn write_record(path: impl AsRef<Path>, url: &str, metrics: &MetricsRecord) -> TableResult<()> {
    write_rows(path.as_ref(), &[ResultRow::analyzed(url, metrics)])
}

fn write_rows(path: &Path, rows: &[ResultRow<'_>]) -> TableResult<()> {
    if has_extension(path, "json") {
        let json = serde_json::to_string_pretty(rows)?;
        return std::fs::write(path, json + "\n").map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    let header = std::iter::once(URL_COLUMN)
        .chain(COLUMNS)
        .chain(std::iter::once(STATUS_COLUMN));
    writer.write_record(header).map_err(csv_err)?;
    for row in rows {
        writer.write_record(row.csv_record()).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
