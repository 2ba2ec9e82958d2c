use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::options::ScoringOptions;
use crate::model::scores::ScoreTable;
use crate::model::tables::{ExpressionTable, MarkerTable};
use crate::pipeline::ScoringOutput;
use crate::report::json::render_summary_json;
use crate::report::tsv::render_scores;
use crate::report::{
    ClassSummary, Dimensions, InputSummary, ReportError, RunSummary, SampleSummary, ToolMeta,
    argmax_positive, median,
};

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub markers: &'a MarkerTable,
    pub expression: &'a ExpressionTable,
    pub output: &'a ScoringOutput,
    pub options: &'a ScoringOptions,

    pub markers_path: &'a Path,
    pub expression_path: &'a Path,
    pub out_path: &'a Path,
    pub delimiter: &'a str,

    pub tool_name: String,
    pub tool_version: String,
}

pub fn write_reports(
    input: &Stage5Input<'_>,
    summary_path: Option<&Path>,
) -> Result<(), ReportError> {
    write_scores(input.out_path, input.delimiter, &input.output.scores)?;

    if let Some(path) = summary_path {
        let summary = build_summary(input);
        write_summary(path, &summary)?;
    }

    Ok(())
}

pub fn write_scores(
    path: &Path,
    delimiter: &str,
    scores: &ScoreTable,
) -> Result<(), ReportError> {
    write_text(path, &render_scores(scores, delimiter))
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let json = render_summary_json(summary)?;
    write_text(path, &json)
}

pub fn build_summary(input: &Stage5Input<'_>) -> RunSummary {
    let output = input.output;
    let scores = &output.scores;
    let audit = &output.audit;

    let classes = scores
        .classes
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let column: Vec<f64> = scores.scores.iter().map(|row| row[col]).collect();
            ClassSummary {
                name: name.clone(),
                max_score: audit.max_scores[col],
                median_score: median(&column),
            }
        })
        .collect();

    let samples = scores
        .samples
        .iter()
        .enumerate()
        .map(|(idx, name)| SampleSummary {
            name: name.clone(),
            libsize: output.libsizes[idx],
            expressed_genes: output.expressed_per_sample[idx],
            filtered_genes: output.filtered_per_sample[idx],
            expressed_markers: audit.expressed_markers[idx],
            top_class: argmax_positive(&scores.scores[idx]).map(|c| scores.classes[c].clone()),
        })
        .collect();

    RunSummary {
        tool: ToolMeta {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
        },
        inputs: InputSummary {
            markers: input.markers_path.display().to_string(),
            expression: input.expression_path.display().to_string(),
            output: input.out_path.display().to_string(),
            delimiter: input.delimiter.to_string(),
        },
        options: input.options.clone(),
        dimensions: Dimensions {
            n_markers: input.markers.n_genes(),
            n_classes: input.markers.n_classes(),
            n_samples: input.expression.n_samples(),
            n_genes_expression: input.expression.n_genes(),
            n_genes_shared: audit.shared_genes,
            n_genes_marker_only: audit.marker_only_genes.len(),
            n_genes_expression_only: audit.expression_only_genes.len(),
        },
        classes,
        samples,
        warnings: audit.warnings.clone(),
    }
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
