//! Batch command: analyze every URL in an input table.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use lexmetric_core::{BatchEntry, BatchOptions, Config, table};

use super::AnalysisArgs;

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV table with a `URL` column, or a .txt file with one URL per line.
    pub input: Utf8PathBuf,

    /// Result table (.csv or .json).
    #[arg(short, long, value_name = "FILE", default_value = "output.csv")]
    pub output: Utf8PathBuf,

    /// Worker threads (1 = sequential).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[derive(Serialize)]
struct BatchSummary<'a> {
    input: &'a str,
    output: &'a str,
    total: usize,
    analyzed: usize,
    failed: usize,
    failures: Vec<Failure<'a>>,
}

#[derive(Serialize)]
struct Failure<'a> {
    url: &'a str,
    reason: &'a str,
}

/// Analyze every URL from `args.input` and write one row per URL.
#[instrument(name = "cmd_batch", skip_all, fields(input = %args.input))]
pub fn cmd_batch(
    args: BatchArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let urls = table::read_urls(args.input.as_std_path())
        .with_context(|| format!("failed to read URLs from {}", args.input))?;
    let options = BatchOptions {
        jobs: args.jobs.unwrap_or(config.jobs),
    };
    debug!(urls = urls.len(), jobs = options.jobs, output = %args.output, "executing batch command");

    let analyzer = args.analysis.build_analyzer(config)?;

    let progress = if global_json || quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(urls.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")?
                .progress_chars("=> "),
        );
        bar
    };
    let result = analyzer.run_batch(&urls, &options, |entry: &BatchEntry| {
        progress.set_message(entry.url().to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    table::write_results(args.output.as_std_path(), &result)
        .with_context(|| format!("failed to write {}", args.output))?;

    let summary = BatchSummary {
        input: args.input.as_str(),
        output: args.output.as_str(),
        total: result.len(),
        analyzed: result.analyzed_count(),
        failed: result.failed_count(),
        failures: result
            .iter()
            .filter_map(|e| {
                e.reason().map(|reason| Failure {
                    url: e.url(),
                    reason,
                })
            })
            .collect(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for failure in &summary.failures {
        println!(
            "{} {}: {}",
            "FAILED".red(),
            failure.url,
            failure.reason.dimmed()
        );
    }
    println!(
        "Analyzed {} of {} URLs ({} failed). Results written to {}",
        summary.analyzed.green(),
        summary.total,
        summary.failed,
        summary.output.cyan()
    );

    Ok(())
}
