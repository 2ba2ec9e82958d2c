pub mod stage2_normalize;
pub mod stage3_filter;
pub mod stage4_scores;
pub mod stage5_report;

use crate::model::options::ScoringOptions;
use crate::model::scores::ScoreTable;
use crate::model::tables::{ExpressionTable, MarkerTable};
use stage2_normalize::run_stage2;
use stage3_filter::run_stage3;
use stage4_scores::{ScoringAudit, run_stage4};

/// Everything the scoring core hands back: the score matrix plus the counts
/// a caller needs for diagnostics.
#[derive(Debug, Clone)]
pub struct ScoringOutput {
    pub scores: ScoreTable,
    pub libsizes: Vec<f64>,
    pub gene_means: Option<Vec<f64>>,
    pub expressed_per_sample: Vec<usize>,
    pub filtered_per_sample: Vec<usize>,
    pub audit: ScoringAudit,
}

/// Normalize, filter and score. Pure: no I/O, no logging, inputs untouched.
pub fn score_markers(
    markers: &MarkerTable,
    expression: &ExpressionTable,
    options: &ScoringOptions,
) -> ScoringOutput {
    let stage2 = run_stage2(expression, options.cpm_normalization);
    let stage3 = run_stage3(&stage2.table, options);
    let stage4 = run_stage4(markers, &stage2.table, &stage3.mask);

    ScoringOutput {
        scores: stage4.scores,
        libsizes: stage2.libsizes,
        gene_means: stage3.gene_means,
        expressed_per_sample: stage3.expressed_per_sample,
        filtered_per_sample: stage3.filtered_per_sample,
        audit: stage4.audit,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
