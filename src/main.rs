mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::{InputError, load_expression, load_markers, parse_delimiter};
use crate::model::options::{ScoringOptions, ThresholdPolicy};
use crate::pipeline::stage4_scores::ScoringWarning;
use crate::pipeline::stage5_report::{Stage5Input, write_reports};
use crate::pipeline::{ScoringOutput, score_markers};
use crate::report::ReportError;

const TOOL_NAME: &str = "kira-markerscore";

#[derive(Debug, Parser)]
#[command(
    name = "kira-markerscore",
    version,
    about = "Score bulk expression samples against cell-type marker tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every sample of an expression table against a marker table.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Expression table: gene ids in the first column, one column per sample.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Marker table: gene ids in the first column, one weight column per class.
    #[arg(short = 'g', long = "markers")]
    markers: PathBuf,

    /// Output score table.
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Field delimiter for all tables (`\t`, `tab` and `comma` are accepted).
    #[arg(short = 'd', long, default_value = "\\t", value_parser = parse_delimiter)]
    delimiter: String,

    /// Minimum expression for a gene to count as expressed. Unset means no floor.
    #[arg(short = 'm', long, allow_negative_numbers = true, value_parser = parse_min_expression)]
    min_expression: Option<f64>,

    /// Require each value to reach its gene's mean across samples.
    #[arg(short = 'a', long)]
    average_filter: bool,

    /// Scale each sample to counts per million before filtering.
    #[arg(short = 'n', long)]
    cpm_normalization: bool,

    /// How --min-expression combines with --average-filter.
    #[arg(long, value_enum, default_value_t = ThresholdPolicy::Both)]
    threshold_policy: ThresholdPolicy,

    /// Also write a JSON run summary to this path.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct RunConfig {
    input_path: PathBuf,
    markers_path: PathBuf,
    out_path: PathBuf,
    summary_path: Option<PathBuf>,
    delimiter: String,
    scoring: ScoringOptions,
    verbose: bool,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            input_path: args.input,
            markers_path: args.markers,
            out_path: args.out,
            summary_path: args.summary,
            delimiter: args.delimiter,
            scoring: ScoringOptions {
                min_expression: args.min_expression,
                average_filter: args.average_filter,
                cpm_normalization: args.cpm_normalization,
                threshold_policy: args.threshold_policy,
            },
            verbose: args.verbose,
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;
    let config = RunConfig::from(args);

    logging::init_logging(config.verbose);
    if let Err(err) = run(&config) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(config: &RunConfig) -> Result<(), AppError> {
    tracing::info!(
        markers = %config.markers_path.display(),
        input = %config.input_path.display(),
        "reading input tables"
    );
    let markers = load_markers(&config.markers_path, &config.delimiter)?;
    let expression = load_expression(&config.input_path, &config.delimiter)?;
    tracing::info!(
        markers = markers.n_genes(),
        classes = markers.n_classes(),
        samples = expression.n_samples(),
        genes = expression.n_genes(),
        "loaded tables"
    );
    log_options(&config.scoring);

    let output = score_markers(&markers, &expression, &config.scoring);
    log_scoring(&output);

    let input = Stage5Input {
        markers: &markers,
        expression: &expression,
        output: &output,
        options: &config.scoring,
        markers_path: &config.markers_path,
        expression_path: &config.input_path,
        out_path: &config.out_path,
        delimiter: &config.delimiter,
        tool_name: TOOL_NAME.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    write_reports(&input, config.summary_path.as_deref())?;

    tracing::info!(path = %config.out_path.display(), "wrote scores");
    if let Some(path) = &config.summary_path {
        tracing::info!(path = %path.display(), "wrote summary");
    }
    Ok(())
}

fn parse_min_expression(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {raw}"))?;
    if !value.is_finite() {
        return Err(format!("minimum expression must be finite, got {raw}"));
    }
    Ok(value)
}

fn log_options(options: &ScoringOptions) {
    if options.cpm_normalization {
        tracing::debug!("normalizing expression data to counts per million");
    }
    match (options.average_filter, options.min_expression) {
        (true, _) => tracing::debug!(
            min_expression = ?options.effective_min(),
            policy = ?options.threshold_policy,
            "filtering by average expression"
        ),
        (false, Some(min)) => tracing::debug!(min_expression = min, "filtering by minimum expression"),
        (false, None) => tracing::debug!("no expression floor; every measured value counts"),
    }
}

fn log_scoring(output: &ScoringOutput) {
    let audit = &output.audit;
    tracing::debug!(
        shared = audit.shared_genes,
        marker_only = audit.marker_only_genes.len(),
        expression_only = audit.expression_only_genes.len(),
        "gene overlap between markers and expression"
    );
    if let Some(means) = &output.gene_means {
        let silent = means.iter().filter(|&&m| m == 0.0).count();
        tracing::debug!(genes = means.len(), zero_mean = silent, "gene means for average filter");
    }
    if !audit.marker_only_genes.is_empty() {
        tracing::debug!(genes = ?audit.marker_only_genes, "marker genes without expression");
    }
    for (idx, sample) in output.scores.samples.iter().enumerate() {
        tracing::debug!(
            sample = %sample,
            expressed = output.expressed_per_sample[idx],
            filtered = output.filtered_per_sample[idx],
            expressed_markers = audit.expressed_markers[idx],
            "filtered genes"
        );
    }
    for warning in &audit.warnings {
        match warning {
            ScoringWarning::EmptyIntersection => tracing::warn!(
                "no marker gene found in the expression table; every score is 0"
            ),
            ScoringWarning::ZeroMaxScore { class } => {
                tracing::warn!(class = %class, "class has no weighted marker; scores are 0")
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
