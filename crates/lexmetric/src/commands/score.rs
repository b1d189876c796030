//! Score command: score a local text file without fetching.

use camino::Utf8PathBuf;
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use lexmetric_core::{Config, MetricsRecord, analyze_text};

use super::{LexiconArgs, print_metrics, read_input_file};

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Plain-text file to score.
    pub file: Utf8PathBuf,

    #[command(flatten)]
    pub lexicon: LexiconArgs,
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    file: &'a str,
    metrics: MetricsRecord,
}

/// Score the text of a local file.
#[instrument(name = "cmd_score", skip_all, fields(file = %args.file))]
pub fn cmd_score(args: ScoreArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!("executing score command");

    let content = read_input_file(&args.file, config.input_limit())?;
    let lexicon = args.lexicon.load_lexicon(config)?;
    let metrics = analyze_text(&content, &lexicon);

    if global_json {
        let report = ScoreReport {
            file: args.file.as_str(),
            metrics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_metrics(args.file.as_str(), &metrics);
    }

    Ok(())
}
