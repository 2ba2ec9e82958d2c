use serde::Serialize;
use thiserror::Error;

use crate::model::options::ScoringOptions;
use crate::pipeline::stage4_scores::ScoringWarning;

pub mod json;
pub mod tsv;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("summary serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub markers: String,
    pub expression: String,
    pub output: String,
    pub delimiter: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dimensions {
    pub n_markers: usize,
    pub n_classes: usize,
    pub n_samples: usize,
    pub n_genes_expression: usize,
    pub n_genes_shared: usize,
    pub n_genes_marker_only: usize,
    pub n_genes_expression_only: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    pub name: String,
    pub max_score: f64,
    pub median_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub name: String,
    pub libsize: f64,
    pub expressed_genes: usize,
    pub filtered_genes: usize,
    pub expressed_markers: usize,
    /// Highest-scoring class; first in class order on ties, absent when every
    /// score is zero.
    pub top_class: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: ToolMeta,
    pub inputs: InputSummary,
    pub options: ScoringOptions,
    pub dimensions: Dimensions,
    pub classes: Vec<ClassSummary>,
    pub samples: Vec<SampleSummary>,
    pub warnings: Vec<ScoringWarning>,
}

pub fn format_score(v: f64) -> String {
    format!("{:.4}", v)
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Index of the largest positive value, first one on ties.
pub fn argmax_positive(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, &v) in values.iter().enumerate() {
        if v <= 0.0 {
            continue;
        }
        match best {
            Some(b) if values[b] >= v => {}
            _ => best = Some(idx),
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
