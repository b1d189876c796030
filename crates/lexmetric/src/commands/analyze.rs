//! Analyze command: fetch one URL and print its metrics.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use lexmetric_core::{Config, MetricsRecord, table};

use super::{AnalysisArgs, print_metrics};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// URL of the page to analyze.
    pub url: String,

    /// Also write the metrics as a one-row table (.csv or .json).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[derive(Serialize)]
struct AnalyzeReport<'a> {
    url: &'a str,
    cache_file: String,
    from_cache: bool,
    metrics: &'a MetricsRecord,
}

/// Fetch (or reuse) a single document and score it.
#[instrument(name = "cmd_analyze", skip_all, fields(url = %args.url))]
pub fn cmd_analyze(args: AnalyzeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(output = ?args.output, "executing analyze command");

    let analyzer = args.analysis.build_analyzer(config)?;
    let (doc, metrics) = analyzer
        .analyze_document(&args.url)
        .with_context(|| format!("failed to analyze {}", args.url))?;

    if let Some(ref output) = args.output {
        table::write_record(output.as_std_path(), &args.url, &metrics)
            .with_context(|| format!("failed to write {output}"))?;
    }

    if global_json {
        let report = AnalyzeReport {
            url: &args.url,
            cache_file: doc.path.display().to_string(),
            from_cache: doc.from_cache,
            metrics: &metrics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_metrics(&args.url, &metrics);
    let source = if doc.from_cache { "cached" } else { "fetched" };
    println!(
        "\n  {} {} ({})",
        "Text:".dimmed(),
        doc.path.display(),
        source
    );
    if let Some(ref output) = args.output {
        println!("  {} {}", "Wrote:".dimmed(), output.green());
    }

    Ok(())
}
